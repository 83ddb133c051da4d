use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;

use ecotrack::workflows::badges::domain::{Badge, BadgeId, NewBadge};
use ecotrack::workflows::badges::{BadgeRepository, BadgeService};
use ecotrack::workflows::challenges::domain::{
    Challenge, ChallengeId, CommunityChallenge, CommunityChallengeId, CommunityParticipation,
    NewChallenge, ParticipationId, PersonalParticipation,
};
use ecotrack::workflows::challenges::{ChallengeRepository, ChallengeService};
use ecotrack::workflows::impact::domain::{ChallengeScope, ImpactRecord, ImpactRecordId};
use ecotrack::workflows::impact::{ImpactRepository, ImpactService};
use ecotrack::workflows::social::domain::{ChallengeInvitation, InvitationId, InvitationStatus};
use ecotrack::workflows::social::{InvitationRepository, InvitationService};
use ecotrack::workflows::users::domain::{NewUserRecord, User, UserId};
use ecotrack::workflows::users::{CredentialError, PasswordHasher, UserRepository, UserService};
use ecotrack::workflows::RepositoryError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Credential hashing backed by bcrypt.
pub(crate) struct BcryptHasher;

impl PasswordHasher for BcryptHasher {
    fn hash(&self, raw: &str) -> Result<String, CredentialError> {
        bcrypt::hash(raw, bcrypt::DEFAULT_COST)
            .map_err(|err| CredentialError::Hash(err.to_string()))
    }
}

#[derive(Default)]
pub(crate) struct InMemoryUserRepository {
    rows: Mutex<HashMap<UserId, User>>,
    next_id: Mutex<i64>,
}

impl UserRepository for InMemoryUserRepository {
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
pub(crate) struct InMemoryBadgeRepository {
    rows: Mutex<HashMap<BadgeId, Badge>>,
    awards: Mutex<HashSet<(UserId, BadgeId)>>,
    next_id: Mutex<i64>,
}

impl BadgeRepository for InMemoryBadgeRepository {
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
pub(crate) struct InMemoryChallengeRepository {
    challenges: Mutex<HashMap<ChallengeId, Challenge>>,
    personal: Mutex<HashMap<ParticipationId, PersonalParticipation>>,
    communities: Mutex<HashMap<CommunityChallengeId, CommunityChallenge>>,
    members: Mutex<HashMap<(CommunityChallengeId, UserId), CommunityParticipation>>,
    next_id: Mutex<i64>,
}

impl InMemoryChallengeRepository {
    fn next(&self) -> i64 {
        let mut next = self.next_id.lock().expect("challenge id mutex poisoned");
        *next += 1;
        *next
    }
}

impl ChallengeRepository for InMemoryChallengeRepository {
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
            .find(|row| row.user_id == user_id && row.challenge_id == challenge_id && row.is_open())
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

    fn update_personal(&self, participation: PersonalParticipation) -> Result<(), RepositoryError> {
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

#[derive(Default)]
pub(crate) struct InMemoryImpactRepository {
    rows: Mutex<HashMap<(UserId, Option<ChallengeScope>), ImpactRecord>>,
    next_id: Mutex<i64>,
}

impl ImpactRepository for InMemoryImpactRepository {
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

#[derive(Default)]
pub(crate) struct InMemoryInvitationRepository {
    rows: Mutex<HashMap<InvitationId, ChallengeInvitation>>,
    next_id: Mutex<i64>,
}

impl InvitationRepository for InMemoryInvitationRepository {
    fn insert(
        &self,
        invitation: ChallengeInvitation,
    ) -> Result<ChallengeInvitation, RepositoryError> {
        let mut next = self.next_id.lock().expect("invitation id mutex poisoned");
        *next += 1;
        let row = ChallengeInvitation {
            id: InvitationId(*next),
            ..invitation
        };
        self.rows
            .lock()
            .expect("invitation mutex poisoned")
            .insert(row.id, row.clone());
        Ok(row)
    }

    fn fetch(&self, id: InvitationId) -> Result<Option<ChallengeInvitation>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("invitation mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn update(&self, invitation: ChallengeInvitation) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("invitation mutex poisoned");
        if !rows.contains_key(&invitation.id) {
            return Err(RepositoryError::NotFound);
        }
        rows.insert(invitation.id, invitation);
        Ok(())
    }

    fn pending_for(
        &self,
        recipient: UserId,
    ) -> Result<Vec<ChallengeInvitation>, RepositoryError> {
        let mut rows: Vec<ChallengeInvitation> = self
            .rows
            .lock()
            .expect("invitation mutex poisoned")
            .values()
            .filter(|invitation| {
                invitation.recipient == recipient
                    && invitation.status == InvitationStatus::Pending
            })
            .cloned()
            .collect();
        rows.sort_by_key(|invitation| invitation.id);
        Ok(rows)
    }
}

/// The full in-memory service graph the binary wires together.
pub(crate) struct Services {
    pub(crate) users:
        Arc<UserService<InMemoryUserRepository, BcryptHasher>>,
    pub(crate) badges:
        Arc<BadgeService<InMemoryBadgeRepository, InMemoryUserRepository>>,
    pub(crate) challenges: Arc<
        ChallengeService<
            InMemoryChallengeRepository,
            InMemoryBadgeRepository,
            InMemoryUserRepository,
        >,
    >,
    pub(crate) impact:
        Arc<ImpactService<InMemoryImpactRepository, InMemoryUserRepository>>,
    pub(crate) invitations: Arc<
        InvitationService<
            InMemoryInvitationRepository,
            InMemoryChallengeRepository,
            InMemoryUserRepository,
        >,
    >,
}

pub(crate) fn build_services() -> Services {
    let users = Arc::new(InMemoryUserRepository::default());
    let challenges = Arc::new(InMemoryChallengeRepository::default());

    let user_service = Arc::new(UserService::new(users.clone(), Arc::new(BcryptHasher)));
    let badge_service = Arc::new(BadgeService::new(
        Arc::new(InMemoryBadgeRepository::default()),
        users.clone(),
    ));
    let challenge_service = Arc::new(ChallengeService::new(
        challenges.clone(),
        users.clone(),
        badge_service.clone(),
    ));
    let impact_service = Arc::new(ImpactService::new(
        Arc::new(InMemoryImpactRepository::default()),
        users.clone(),
    ));
    let invitation_service = Arc::new(InvitationService::new(
        Arc::new(InMemoryInvitationRepository::default()),
        challenges,
        users,
    ));

    Services {
        users: user_service,
        badges: badge_service,
        challenges: challenge_service,
        impact: impact_service,
        invitations: invitation_service,
    }
}

pub(crate) fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| {
            date.and_hms_opt(0, 0, 0)
                .expect("midnight is valid")
                .and_utc()
        })
        .map_err(|err| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD ({err})"))
}
