use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::workflows::challenges::domain::ParticipationId;
use crate::workflows::impact::domain::{ChallengeScope, ImpactRecord, ImpactRecordId};
use crate::workflows::impact::repository::ImpactRepository;
use crate::workflows::impact::service::ImpactService;
use crate::workflows::users::domain::{NewUserRecord, User, UserId};
use crate::workflows::users::repository::UserRepository;
use crate::workflows::RepositoryError;

#[derive(Default)]
pub(super) struct MemoryUsers {
    rows: Mutex<HashMap<UserId, User>>,
    next_id: Mutex<i64>,
}

impl UserRepository for MemoryUsers {
    fn insert(&self, user: NewUserRecord) -> Result<User, RepositoryError> {
        let mut next = self.next_id.lock().expect("user id mutex poisoned");
        *next += 1;
        let row = User {
            id: UserId(*next),
            username: user.username,
            email: user.email,
            profile_picture: None,
            eco_points: 0,
            password_hash: user.password_hash,
        };
        self.rows
            .lock()
            .expect("user mutex poisoned")
            .insert(row.id, row.clone());
        Ok(row)
    }

    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("user mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn fetch_by_identity(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("user mutex poisoned")
            .values()
            .find(|user| user.username == username || user.email == email)
            .cloned())
    }

    fn update(&self, user: User) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("user mutex poisoned");
        if !rows.contains_key(&user.id) {
            return Err(RepositoryError::NotFound);
        }
        rows.insert(user.id, user);
        Ok(())
    }

    fn top_by_eco_points(&self, limit: usize) -> Result<Vec<User>, RepositoryError> {
        let mut users: Vec<User> = self
            .rows
            .lock()
            .expect("user mutex poisoned")
            .values()
            .cloned()
            .collect();
        users.sort_by(|a, b| b.eco_points.cmp(&a.eco_points));
        users.truncate(limit);
        Ok(users)
    }
}

#[derive(Default)]
pub(super) struct MemoryImpact {
    rows: Mutex<HashMap<(UserId, Option<ChallengeScope>), ImpactRecord>>,
    next_id: Mutex<i64>,
}

impl ImpactRepository for MemoryImpact {
    fn create(
        &self,
        user_id: UserId,
        scope: Option<ChallengeScope>,
    ) -> Result<ImpactRecord, RepositoryError> {
        let mut next = self.next_id.lock().expect("impact id mutex poisoned");
        *next += 1;
        let row = ImpactRecord::empty(ImpactRecordId(*next), user_id, scope);
        self.rows
            .lock()
            .expect("impact mutex poisoned")
            .insert((user_id, scope), row.clone());
        Ok(row)
    }

    fn fetch(
        &self,
        user_id: UserId,
        scope: Option<ChallengeScope>,
    ) -> Result<Option<ImpactRecord>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("impact mutex poisoned")
            .get(&(user_id, scope))
            .cloned())
    }

    fn update(&self, record: ImpactRecord) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("impact mutex poisoned");
        let key = (record.user_id, record.scope);
        if !rows.contains_key(&key) {
            return Err(RepositoryError::NotFound);
        }
        rows.insert(key, record);
        Ok(())
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<ImpactRecord>, RepositoryError> {
        let mut records: Vec<ImpactRecord> = self
            .rows
            .lock()
            .expect("impact mutex poisoned")
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }
}

pub(super) fn fixture() -> (Arc<MemoryUsers>, Arc<ImpactService<MemoryImpact, MemoryUsers>>) {
    let users = Arc::new(MemoryUsers::default());
    let service = Arc::new(ImpactService::new(
        Arc::new(MemoryImpact::default()),
        users.clone(),
    ));
    (users, service)
}

pub(super) fn register(users: &MemoryUsers, username: &str) -> User {
    users
        .insert(NewUserRecord {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
        })
        .expect("insert user")
}

pub(super) fn personal_scope() -> Option<ChallengeScope> {
    Some(ChallengeScope::Personal(ParticipationId(1)))
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
