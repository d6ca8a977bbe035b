//! Independently addressable pieces of client state.
//!
//! Every transition takes `&self` and returns the next slice. Loaded values are
//! shared `Arc` snapshots, so a caller holding an earlier snapshot never sees it
//! change underneath them.

use std::sync::Arc;

use crate::models::Connection;
use crate::models::ConnectionRequest;
use crate::models::FeedEntry;
use crate::models::Profile;
use crate::models::User;

pub trait SliceItem: Clone {
    /// What `remove_by_id` produces when the slice was never loaded:
    /// `true` means an empty list, `false` keeps it unloaded.
    const EMPTY_WHEN_UNLOADED: bool;

    fn item_id(&self) -> &str;
}

impl SliceItem for Profile {
    const EMPTY_WHEN_UNLOADED: bool = true;

    fn item_id(&self) -> &str {
        &self.id
    }
}

impl SliceItem for ConnectionRequest {
    const EMPTY_WHEN_UNLOADED: bool = false;

    fn item_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserSlice(Option<Arc<User>>);

impl UserSlice {
    pub fn set(&self, user: User) -> Self {
        Self(Some(Arc::new(user)))
    }

    pub fn clear(&self) -> Self {
        Self(None)
    }

    pub fn get(&self) -> Option<&User> {
        self.0.as_deref()
    }

    pub fn snapshot(&self) -> Option<Arc<User>> {
        self.0.clone()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSlice<T> {
    items: Option<Arc<[T]>>,
}

impl<T> Default for ListSlice<T> {
    fn default() -> Self {
        Self { items: None }
    }
}

impl<T: SliceItem> ListSlice<T> {
    pub fn set(&self, list: Vec<T>) -> Self {
        Self {
            items: Some(Arc::from(list)),
        }
    }

    pub fn clear(&self) -> Self {
        Self { items: None }
    }

    pub fn remove_by_id(&self, id: &str) -> Self {
        match &self.items {
            Some(items) => Self {
                items: Some(
                    items
                        .iter()
                        .filter(|item| item.item_id() != id)
                        .cloned()
                        .collect(),
                ),
            },
            None if T::EMPTY_WHEN_UNLOADED => Self {
                items: Some(Arc::from(Vec::new())),
            },
            None => Self { items: None },
        }
    }

    pub fn items(&self) -> Option<&[T]> {
        self.items.as_deref()
    }

    pub fn snapshot(&self) -> Option<Arc<[T]>> {
        self.items.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.items.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, |items| items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items
            .as_ref()
            .is_some_and(|items| items.iter().any(|item| item.item_id() == id))
    }
}

pub type FeedSlice = ListSlice<FeedEntry>;
pub type ConnectionSlice = ListSlice<Connection>;
pub type RequestSlice = ListSlice<ConnectionRequest>;

impl RequestSlice {
    pub fn clear_all(&self) -> Self {
        self.clear()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Slices {
    pub user: UserSlice,
    pub feed: FeedSlice,
    pub request: RequestSlice,
    pub connection: ConnectionSlice,
}
