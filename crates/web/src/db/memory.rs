//! In-memory stores for service tests.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Duration, Utc};

use lostfound_core::{ItemId, UserId};

use super::{ItemStore, RepositoryError, UserStore};
use crate::models::{Item, ItemChanges, ItemFilter, NewItem, NewUser, Page, PageRequest, User};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<(User, String)>>,
}

impl MemoryUserStore {
    pub fn hash_of(&self, username: &str) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.username == username)
            .map(|(_, h)| h.clone())
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

impl UserStore for MemoryUserStore {
    async fn get_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone()))
    }

    async fn insert(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|(u, _)| u.username == user.username) {
            return Err(RepositoryError::Conflict("username already exists".to_owned()));
        }
        let id = i32::try_from(users.len()).unwrap() + 1;
        let created = User {
            id: UserId::new(id),
            username: user.username.clone(),
            is_admin: user.is_admin,
            created_at: Utc::now(),
        };
        users.push((created.clone(), user.password_hash.clone()));
        Ok(created)
    }

    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let entry = users
            .iter_mut()
            .find(|(u, _)| u.username == username)
            .ok_or(RepositoryError::NotFound)?;
        password_hash.clone_into(&mut entry.1);
        Ok(())
    }
}

/// Item store whose writes can be made to fail on demand.
#[derive(Default)]
pub struct MemoryItemStore {
    items: Mutex<Vec<Item>>,
    next_id: Mutex<i32>,
    fail_writes: AtomicBool,
}

impl MemoryItemStore {
    /// Make every subsequent insert/update/delete fail with a database error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<Item> {
        self.items.lock().unwrap().clone()
    }

    fn check_writable(&self) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

impl ItemStore for MemoryItemStore {
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn list_by_filter(
        &self,
        filter: &ItemFilter,
        page: PageRequest,
    ) -> Result<Page<Item>, RepositoryError> {
        let mut matching: Vec<Item> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| matches(filter, i))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap();
        let limit = usize::try_from(page.limit()).unwrap();
        let items = matching.into_iter().skip(offset).take(limit).collect();
        Ok(Page::new(items, page, total))
    }

    async fn distinct_locations(&self) -> Result<Vec<String>, RepositoryError> {
        let mut locations: Vec<String> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .map(|i| i.location.clone())
            .collect();
        locations.sort();
        locations.dedup();
        Ok(locations)
    }

    async fn insert(&self, item: &NewItem) -> Result<Item, RepositoryError> {
        self.check_writable()?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        // Strictly increasing timestamps keep ordering deterministic.
        let created_at = Utc::now() + Duration::milliseconds(i64::from(*next_id));
        let created = Item {
            id: ItemId::new(*next_id),
            kind: item.kind,
            name: item.name.clone(),
            description: item.description.clone(),
            location: item.location.clone(),
            contact: item.contact.clone(),
            image: item.image.clone(),
            created_at,
            user_id: item.user_id,
        };
        self.items.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: ItemId,
        changes: &ItemChanges,
    ) -> Result<Option<Item>, RepositoryError> {
        self.check_writable()?;
        let mut items = self.items.lock().unwrap();
        let Some(item) = items.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        item.kind = changes.kind;
        item.name.clone_from(&changes.name);
        item.description.clone_from(&changes.description);
        item.location.clone_from(&changes.location);
        item.contact = changes.contact.clone();
        if let Some(image) = &changes.image {
            item.image = Some(image.clone());
        }
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        self.check_writable()?;
        let mut items = self.items.lock().unwrap();
        let position = items.iter().position(|i| i.id == id);
        Ok(position.map(|p| items.remove(p)))
    }
}

/// The listing predicate as SQL applies it: case-sensitive substring search
/// over name and description, exact location equality.
fn matches(filter: &ItemFilter, item: &Item) -> bool {
    if item.kind != filter.kind {
        return false;
    }
    if let Some(term) = &filter.search
        && !item.name.contains(term.as_str())
        && !item.description.contains(term.as_str())
    {
        return false;
    }
    if let Some(location) = &filter.location
        && &item.location != location
    {
        return false;
    }
    true
}

mod tests {
    use lostfound_core::{ContactNumber, ItemKind};

    use super::*;

    fn item(kind: ItemKind, name: &str, description: &str, location: &str) -> Item {
        Item {
            id: ItemId::new(1),
            kind,
            name: kind.prefixed_name(name),
            description: description.to_owned(),
            location: location.to_owned(),
            contact: ContactNumber::parse("081234567890").unwrap(),
            image: None,
            created_at: Utc::now(),
            user_id: UserId::new(1),
        }
    }

    #[test]
    fn test_filter_matches_name_or_description() {
        let keys = item(ItemKind::Found, "Keys", "three keys on a ring", "Area Parkir");
        let filter = ItemFilter::kind(ItemKind::Found).with_search(Some("ring"));
        assert!(matches(&filter, &keys));

        let filter = ItemFilter::kind(ItemKind::Found).with_search(Some("Keys"));
        assert!(matches(&filter, &keys));

        let filter = ItemFilter::kind(ItemKind::Found).with_search(Some("keys on a RING"));
        assert!(!matches(&filter, &keys), "search is case-sensitive");
    }

    #[test]
    fn test_filter_location_is_exact() {
        let keys = item(ItemKind::Found, "Keys", "", "Area Parkir");
        let exact = ItemFilter::kind(ItemKind::Found).with_location(Some("Area Parkir"));
        let partial = ItemFilter::kind(ItemKind::Found).with_location(Some("Parkir"));
        assert!(matches(&exact, &keys));
        assert!(!matches(&partial, &keys));
    }

    #[test]
    fn test_filter_kind_mismatch() {
        let keys = item(ItemKind::Found, "Keys", "", "Area Parkir");
        assert!(!matches(&ItemFilter::kind(ItemKind::Lost), &keys));
    }
}
