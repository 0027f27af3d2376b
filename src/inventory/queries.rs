use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::entities::{collection, item};
use crate::error::AppError;
use crate::inventory::repository::InventoryRepository;

pub const MAX_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDto {
    pub id: Uuid,
    pub name: String,
    pub hostname: String,
    pub version: String,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub location: String,
    pub collection_id: Uuid,
    pub is_active: bool,
}

impl From<item::Model> for ItemDto {
    fn from(model: item::Model) -> Self {
        ItemDto {
            id: model.id,
            name: model.name,
            hostname: model.hostname,
            version: model.version,
            brand: model.brand,
            model: model.model,
            serial_number: model.serial_number,
            location: model.location,
            collection_id: model.collection_id,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub items: Vec<ItemDto>,
}

impl From<(collection::Model, Vec<item::Model>)> for CollectionDto {
    fn from((model, items): (collection::Model, Vec<item::Model>)) -> Self {
        CollectionDto {
            id: model.id,
            name: model.name,
            description: model.description,
            is_active: model.is_active,
            items: items.into_iter().map(ItemDto::from).collect(),
        }
    }
}

// --- Queries ---

#[derive(Debug, Clone, Deserialize)]
pub struct GetItemByIdQuery {
    pub item_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListItemsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub is_active: Option<bool>,
}

fn default_limit() -> usize {
    100
}

impl Default for ListItemsQuery {
    fn default() -> Self {
        ListItemsQuery {
            limit: default_limit(),
            offset: 0,
            is_active: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItemsQuery {
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountItemsQuery {
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetItemsByCollectionQuery {
    pub collection_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCollectionsQuery {
    #[serde(default)]
    pub is_active: Option<bool>,
}

// --- Query handlers ---

pub struct GetItemByIdHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> GetItemByIdHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetItemByIdQuery) -> Result<Option<ItemDto>, AppError> {
        Ok(self
            .repository
            .get_item_by_id(query.item_id)
            .await?
            .map(ItemDto::from))
    }
}

pub struct ListItemsHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> ListItemsHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Status filtering happens in the store, pagination in memory.
    pub async fn handle(&self, query: ListItemsQuery) -> Result<Vec<ItemDto>, AppError> {
        if query.limit == 0 || query.limit > MAX_PAGE_SIZE {
            return Err(AppError::InvalidInput(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let items = match query.is_active {
            Some(active) => self.repository.list_items_by_status(active).await?,
            None => self.repository.list_all_items().await?,
        };
        Ok(items
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(ItemDto::from)
            .collect())
    }
}

pub struct SearchItemsHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> SearchItemsHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: SearchItemsQuery) -> Result<Vec<ItemDto>, AppError> {
        if query.query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "search query cannot be empty".to_string(),
            ));
        }
        let items = self.repository.search_items(&query.query).await?;
        Ok(items.into_iter().map(ItemDto::from).collect())
    }
}

pub struct CountItemsHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> CountItemsHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: CountItemsQuery) -> Result<u64, AppError> {
        self.repository.count_items(query.is_active).await
    }
}

pub struct GetItemsByCollectionHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> GetItemsByCollectionHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetItemsByCollectionQuery,
    ) -> Result<Vec<ItemDto>, AppError> {
        if self
            .repository
            .get_collection_by_id(query.collection_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found("Collection", query.collection_id));
        }

        let items = self
            .repository
            .get_items_by_collection_id(query.collection_id)
            .await?;
        Ok(items.into_iter().map(ItemDto::from).collect())
    }
}

pub struct ListCollectionsHandler<R> {
    repository: R,
}

impl<R: InventoryRepository> ListCollectionsHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: ListCollectionsQuery,
    ) -> Result<Vec<CollectionDto>, AppError> {
        let collections = self
            .repository
            .list_collections_with_items(query.is_active)
            .await?;
        Ok(collections.into_iter().map(CollectionDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::repository::testing::InMemoryInventoryRepository;

    fn collection(name: &str, is_active: bool) -> collection::Model {
        collection::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: "test".to_string(),
            is_active,
        }
    }

    fn item(collection_id: Uuid, name: &str, location: &str, is_active: bool) -> item::Model {
        item::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            hostname: format!("{name}.local"),
            version: "1.0".to_string(),
            brand: "Acme".to_string(),
            model: "X200".to_string(),
            serial_number: format!("SN-{name}"),
            location: location.to_string(),
            collection_id,
            is_active,
        }
    }

    fn seeded_repo() -> (InMemoryInventoryRepository, collection::Model) {
        let col = collection("network", true);
        let items = vec![
            item(col.id, "router", "rack-1", true),
            item(col.id, "switch", "rack-1", true),
            item(col.id, "firewall", "rack-2", false),
        ];
        (
            InMemoryInventoryRepository::with_data(vec![col.clone()], items),
            col,
        )
    }

    #[tokio::test]
    async fn test_get_item_by_id_absent() {
        let (repo, _) = seeded_repo();
        let handler = GetItemByIdHandler::new(repo);
        let result = handler
            .handle(GetItemByIdQuery {
                item_id: Uuid::new_v4(),
            })
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_items_filters_and_paginates() {
        let (repo, _) = seeded_repo();
        let handler = ListItemsHandler::new(repo);

        let active = handler
            .handle(ListItemsQuery {
                is_active: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.len(), 2);

        let window = handler
            .handle(ListItemsQuery {
                limit: 1,
                offset: 1,
                is_active: None,
            })
            .await
            .unwrap();
        assert_eq!(window.len(), 1);

        let err = handler
            .handle(ListItemsQuery {
                limit: 0,
                offset: 0,
                is_active: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_search_items_matches_any_keyword_across_fields() {
        let (repo, _) = seeded_repo();
        let handler = SearchItemsHandler::new(repo);

        // One keyword hits a name, the other a location.
        let hits = handler
            .handle(SearchItemsQuery {
                query: "ROUTER rack-2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);

        let none = handler
            .handle(SearchItemsQuery {
                query: "printer".to_string(),
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_search_items_rejects_blank_query() {
        let (repo, _) = seeded_repo();
        let handler = SearchItemsHandler::new(repo);
        let err = handler
            .handle(SearchItemsQuery {
                query: "   ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_count_items_with_and_without_filter() {
        let (repo, _) = seeded_repo();
        let handler = CountItemsHandler::new(repo);

        assert_eq!(
            handler
                .handle(CountItemsQuery { is_active: None })
                .await
                .unwrap(),
            3
        );
        assert_eq!(
            handler
                .handle(CountItemsQuery {
                    is_active: Some(false)
                })
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_items_by_collection_requires_collection() {
        let (repo, col) = seeded_repo();
        let handler = GetItemsByCollectionHandler::new(repo);

        let items = handler
            .handle(GetItemsByCollectionQuery {
                collection_id: col.id,
            })
            .await
            .unwrap();
        assert_eq!(items.len(), 3);

        let err = handler
            .handle(GetItemsByCollectionQuery {
                collection_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_collections_nests_items_and_filters_status() {
        let active = collection("network", true);
        let retired = collection("retired", false);
        let repo = InMemoryInventoryRepository::with_data(
            vec![active.clone(), retired.clone()],
            vec![item(active.id, "router", "rack-1", true)],
        );
        let handler = ListCollectionsHandler::new(repo);

        let all = handler.handle(ListCollectionsQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        let network = all.iter().find(|c| c.id == active.id).unwrap();
        assert_eq!(network.items.len(), 1);

        let only_active = handler
            .handle(ListCollectionsQuery {
                is_active: Some(true),
            })
            .await
            .unwrap();
        assert_eq!(only_active.len(), 1);
        assert_eq!(only_active[0].id, active.id);
    }
}
