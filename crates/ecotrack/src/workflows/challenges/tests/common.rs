use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::workflows::badges::domain::{Badge, BadgeId, NewBadge};
use crate::workflows::badges::repository::BadgeRepository;
use crate::workflows::badges::service::BadgeService;
use crate::workflows::challenges::domain::{
    Challenge, ChallengeId, CommunityChallenge, CommunityChallengeId, CommunityParticipation,
    NewChallenge, ParticipationId, PersonalParticipation,
};
use crate::workflows::challenges::repository::ChallengeRepository;
use crate::workflows::challenges::service::ChallengeService;
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
pub(super) struct MemoryBadges {
    rows: Mutex<HashMap<BadgeId, Badge>>,
    awards: Mutex<HashSet<(UserId, BadgeId)>>,
    next_id: Mutex<i64>,
}

impl BadgeRepository for MemoryBadges {
    fn insert(&self, badge: NewBadge) -> Result<Badge, RepositoryError> {
        let mut next = self.next_id.lock().expect("badge id mutex poisoned");
        *next += 1;
        let row = Badge {
            id: BadgeId(*next),
            name: badge.name,
            eco_points_required: badge.eco_points_required,
        };
        self.rows
            .lock()
            .expect("badge mutex poisoned")
            .insert(row.id, row.clone());
        Ok(row)
    }

    fn fetch_by_name(&self, name: &str) -> Result<Option<Badge>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("badge mutex poisoned")
            .values()
            .find(|badge| badge.name == name)
            .cloned())
    }

    fn eligible(&self, eco_points: i64) -> Result<Vec<Badge>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("badge mutex poisoned")
            .values()
            .filter(|badge| badge.eco_points_required <= eco_points)
            .cloned()
            .collect())
    }

    fn awarded_to(&self, user_id: UserId) -> Result<Vec<Badge>, RepositoryError> {
        let rows = self.rows.lock().expect("badge mutex poisoned");
        Ok(self
            .awards
            .lock()
            .expect("award mutex poisoned")
            .iter()
            .filter(|(holder, _)| *holder == user_id)
            .filter_map(|(_, badge_id)| rows.get(badge_id).cloned())
            .collect())
    }

    fn is_awarded(&self, user_id: UserId, badge_id: BadgeId) -> Result<bool, RepositoryError> {
        Ok(self
            .awards
            .lock()
            .expect("award mutex poisoned")
            .contains(&(user_id, badge_id)))
    }

    fn award(&self, user_id: UserId, badge_id: BadgeId) -> Result<(), RepositoryError> {
        let mut awards = self.awards.lock().expect("award mutex poisoned");
        if !awards.insert((user_id, badge_id)) {
            return Err(RepositoryError::Conflict);
        }
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryChallenges {
    challenges: Mutex<HashMap<ChallengeId, Challenge>>,
    personal: Mutex<HashMap<ParticipationId, PersonalParticipation>>,
    communities: Mutex<HashMap<CommunityChallengeId, CommunityChallenge>>,
    members: Mutex<HashMap<(CommunityChallengeId, UserId), CommunityParticipation>>,
    next_id: Mutex<i64>,
}

impl MemoryChallenges {
    fn next(&self) -> i64 {
        let mut next = self.next_id.lock().expect("challenge id mutex poisoned");
        *next += 1;
        *next
    }
}

impl ChallengeRepository for MemoryChallenges {
    fn insert_challenge(&self, challenge: NewChallenge) -> Result<Challenge, RepositoryError> {
        let row = Challenge {
            id: ChallengeId(self.next()),
            name: challenge.name,
            description: challenge.description,
            eco_points: challenge.eco_points,
            start_date: challenge.start_date,
            end_date: challenge.end_date,
        };
        self.challenges
            .lock()
            .expect("challenge mutex poisoned")
            .insert(row.id, row.clone());
        Ok(row)
    }

    fn fetch_challenge(&self, id: ChallengeId) -> Result<Option<Challenge>, RepositoryError> {
        Ok(self
            .challenges
            .lock()
            .expect("challenge mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn fetch_challenge_by_name(&self, name: &str) -> Result<Option<Challenge>, RepositoryError> {
        Ok(self
            .challenges
            .lock()
            .expect("challenge mutex poisoned")
            .values()
            .find(|challenge| challenge.name == name)
            .cloned())
    }

    fn update_challenge(&self, challenge: Challenge) -> Result<(), RepositoryError> {
        let mut rows = self.challenges.lock().expect("challenge mutex poisoned");
        if !rows.contains_key(&challenge.id) {
            return Err(RepositoryError::NotFound);
        }
        rows.insert(challenge.id, challenge);
        Ok(())
    }

    fn insert_personal(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
        start_date: DateTime<Utc>,
    ) -> Result<PersonalParticipation, RepositoryError> {
        let row = PersonalParticipation {
            id: ParticipationId(self.next()),
            user_id,
            challenge_id,
            start_date,
            end_date: None,
        };
        self.personal
            .lock()
            .expect("personal mutex poisoned")
            .insert(row.id, row.clone());
        Ok(row)
    }

    fn fetch_personal(
        &self,
        id: ParticipationId,
    ) -> Result<Option<PersonalParticipation>, RepositoryError> {
        Ok(self
            .personal
            .lock()
            .expect("personal mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn active_personal(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Option<PersonalParticipation>, RepositoryError> {
        Ok(self
            .personal
            .lock()
            .expect("personal mutex poisoned")
            .values()
            .find(|row| {
                row.user_id == user_id && row.challenge_id == challenge_id && row.is_open()
            })
            .cloned())
    }

    fn any_personal(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Option<PersonalParticipation>, RepositoryError> {
        Ok(self
            .personal
            .lock()
            .expect("personal mutex poisoned")
            .values()
            .find(|row| row.user_id == user_id && row.challenge_id == challenge_id)
            .cloned())
    }

    fn list_personal(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PersonalParticipation>, RepositoryError> {
        let mut rows: Vec<PersonalParticipation> = self
            .personal
            .lock()
            .expect("personal mutex poisoned")
            .values()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    fn update_personal(
        &self,
        participation: PersonalParticipation,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.personal.lock().expect("personal mutex poisoned");
        if !rows.contains_key(&participation.id) {
            return Err(RepositoryError::NotFound);
        }
        rows.insert(participation.id, participation);
        Ok(())
    }

    fn delete_personal(&self, id: ParticipationId) -> Result<(), RepositoryError> {
        let mut rows = self.personal.lock().expect("personal mutex poisoned");
        rows.remove(&id).ok_or(RepositoryError::NotFound)?;
        Ok(())
    }

    fn open_personal_due(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<PersonalParticipation>, RepositoryError> {
        let challenges = self.challenges.lock().expect("challenge mutex poisoned");
        Ok(self
            .personal
            .lock()
            .expect("personal mutex poisoned")
            .values()
            .filter(|row| {
                row.is_open()
                    && challenges
                        .get(&row.challenge_id)
                        .is_some_and(|challenge| challenge.end_date <= now)
            })
            .cloned()
            .collect())
    }

    fn insert_community(
        &self,
        challenge_id: ChallengeId,
        created_by: UserId,
    ) -> Result<CommunityChallenge, RepositoryError> {
        let row = CommunityChallenge {
            id: CommunityChallengeId(self.next()),
            challenge_id,
            created_by,
        };
        self.communities
            .lock()
            .expect("community mutex poisoned")
            .insert(row.id, row.clone());
        Ok(row)
    }

    fn fetch_community(
        &self,
        id: CommunityChallengeId,
    ) -> Result<Option<CommunityChallenge>, RepositoryError> {
        Ok(self
            .communities
            .lock()
            .expect("community mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn delete_community(&self, id: CommunityChallengeId) -> Result<(), RepositoryError> {
        let mut rows = self.communities.lock().expect("community mutex poisoned");
        rows.remove(&id).ok_or(RepositoryError::NotFound)?;
        self.members
            .lock()
            .expect("member mutex poisoned")
            .retain(|(community_id, _), _| *community_id != id);
        Ok(())
    }

    fn insert_member(
        &self,
        member: CommunityParticipation,
    ) -> Result<CommunityParticipation, RepositoryError> {
        let mut rows = self.members.lock().expect("member mutex poisoned");
        let key = (member.community_challenge_id, member.participant_id);
        if rows.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        rows.insert(key, member.clone());
        Ok(member)
    }

    fn fetch_member(
        &self,
        community_id: CommunityChallengeId,
        user_id: UserId,
    ) -> Result<Option<CommunityParticipation>, RepositoryError> {
        Ok(self
            .members
            .lock()
            .expect("member mutex poisoned")
            .get(&(community_id, user_id))
            .cloned())
    }

    fn update_member(&self, member: CommunityParticipation) -> Result<(), RepositoryError> {
        let mut rows = self.members.lock().expect("member mutex poisoned");
        let key = (member.community_challenge_id, member.participant_id);
        if !rows.contains_key(&key) {
            return Err(RepositoryError::NotFound);
        }
        rows.insert(key, member);
        Ok(())
    }

    fn member_count(&self, community_id: CommunityChallengeId) -> Result<usize, RepositoryError> {
        Ok(self
            .members
            .lock()
            .expect("member mutex poisoned")
            .keys()
            .filter(|(id, _)| *id == community_id)
            .count())
    }

    fn list_memberships(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CommunityParticipation>, RepositoryError> {
        Ok(self
            .members
            .lock()
            .expect("member mutex poisoned")
            .values()
            .filter(|member| member.participant_id == user_id)
            .cloned()
            .collect())
    }

    fn open_members_due(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<CommunityParticipation>, RepositoryError> {
        let challenges = self.challenges.lock().expect("challenge mutex poisoned");
        let communities = self.communities.lock().expect("community mutex poisoned");
        Ok(self
            .members
            .lock()
            .expect("member mutex poisoned")
            .values()
            .filter(|member| {
                member.is_open()
                    && communities
                        .get(&member.community_challenge_id)
                        .and_then(|community| challenges.get(&community.challenge_id))
                        .is_some_and(|challenge| challenge.end_date <= now)
            })
            .cloned()
            .collect())
    }
}

pub(super) struct Fixture {
    pub users: Arc<MemoryUsers>,
    pub challenges: Arc<MemoryChallenges>,
    pub badges: Arc<BadgeService<MemoryBadges, MemoryUsers>>,
    pub service: Arc<ChallengeService<MemoryChallenges, MemoryBadges, MemoryUsers>>,
}

pub(super) fn fixture() -> Fixture {
    let users = Arc::new(MemoryUsers::default());
    let challenges = Arc::new(MemoryChallenges::default());
    let badges = Arc::new(BadgeService::new(
        Arc::new(MemoryBadges::default()),
        users.clone(),
    ));
    let service = Arc::new(ChallengeService::new(
        challenges.clone(),
        users.clone(),
        badges.clone(),
    ));
    Fixture {
        users,
        challenges,
        badges,
        service,
    }
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid timestamp")
}

pub(super) fn register(fixture: &Fixture, username: &str, eco_points: i64) -> User {
    let mut user = fixture
        .users
        .insert(NewUserRecord {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
        })
        .expect("insert user");
    user.eco_points = eco_points;
    fixture.users.update(user.clone()).expect("update user");
    user
}

pub(super) fn weekly_challenge(name: &str, eco_points: i64) -> NewChallenge {
    NewChallenge {
        name: name.to_string(),
        description: format!("{name} description"),
        eco_points,
        start_date: now(),
        end_date: now() + Duration::days(7),
    }
}
