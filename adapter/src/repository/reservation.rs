use crate::{
    database::model::{reservation::ReservationRow, space::SpaceRow},
    kv::{key, KvClient},
};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use derive_new::new;
use kernel::{
    model::{
        id::{CondominiumId, ReservationId, SpaceId, UserId},
        reservation::{
            event::{CancelReservation, CreateReservation, UpdateReservationStatus},
            schedule::find_conflict,
            Reservation, ReservationStatus,
        },
        user::User,
    },
    repository::reservation::ReservationRepository,
};
use shared::error::{AppError, AppResult};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(new)]
pub struct ReservationRepositoryImpl {
    kv: KvClient,
    // スペースごとのロック。重複チェックから保存までを直列化する
    #[new(default)]
    space_locks: DashMap<SpaceId, Arc<Mutex<()>>>,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let CreateReservation {
            space_id,
            span,
            requested_user,
        } = event;

        let _guard = self.lock_space(space_id).await;

        // ① スペースの存在確認 ＋ ativo チェック
        // 別の condominium のスペースも見つからない扱いとする
        let space = match self.kv.get::<SpaceRow>(&key::space(space_id)).await? {
            Some(s) if s.ativo && Some(s.id_condominio) == requested_user.condominium_id => s,
            _ => {
                return Err(AppError::EntityNotFound(format!(
                    "space ({space_id}) was not found"
                )))
            }
        };

        // ② 希望時間帯がキャンセルされていない既存予約と重なっていないか確認
        let existing = self.find_by_space_id(space_id).await?;
        if let Some(conflict) = find_conflict(space_id, &span, &existing) {
            return Err(AppError::ReservationConflict(format!(
                "space ({space_id}) is already reserved from {} to {}",
                conflict.span.start(),
                conflict.span.end()
            )));
        }

        let reservation = Reservation {
            reservation_id: ReservationId::new(),
            space_id,
            reserved_by: requested_user.user_id,
            span,
            status: ReservationStatus::Pending,
            space_name: space.nome,
            requester_name: requested_user.user_name,
            created_at: Utc::now(),
            updated_at: None,
            cancelled_at: None,
        };

        // 予約本体を先に書き、索引の書き込みに失敗したら本体を取り消す
        self.store(&reservation).await?;
        if let Err(e) = self
            .kv
            .set(&key::reservation_space(reservation.reservation_id), &space_id)
            .await
        {
            let record = key::reservation(space_id, reservation.reservation_id);
            if let Err(cleanup) = self.kv.delete(&record).await {
                tracing::error!(
                    error.message = %cleanup,
                    reservation_id = %reservation.reservation_id,
                    "failed to roll back reservation record"
                );
            }
            return Err(e);
        }

        tracing::info!(
            reservation_id = %reservation.reservation_id,
            space_id = %space_id,
            user_id = %reservation.reserved_by,
            "reservation created"
        );
        Ok(reservation)
    }

    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<Reservation> {
        let UpdateReservationStatus {
            reservation_id,
            status,
            requested_user,
        } = event;

        if !requested_user.is_administrator() {
            return Err(AppError::ForbiddenOperation(
                "only administrators can approve or reject reservations".into(),
            ));
        }
        if status == ReservationStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "status must be {} or {}",
                ReservationStatus::Confirmed,
                ReservationStatus::Cancelled
            )));
        }

        let space_id = self.space_id_of(reservation_id).await?;
        let _guard = self.lock_space(space_id).await;
        let mut reservation = self.load(space_id, reservation_id).await?;
        self.ensure_administers(&requested_user, space_id).await?;

        let previous = reservation.status;
        reservation.transition_to(status, Utc::now())?;
        self.store(&reservation).await?;

        tracing::info!(
            reservation_id = %reservation_id,
            from = %previous,
            to = %status,
            "reservation status updated"
        );
        Ok(reservation)
    }

    async fn cancel(&self, event: CancelReservation) -> AppResult<Reservation> {
        let CancelReservation {
            reservation_id,
            requested_user,
        } = event;

        let space_id = self.space_id_of(reservation_id).await?;
        let _guard = self.lock_space(space_id).await;
        let mut reservation = self.load(space_id, reservation_id).await?;

        if reservation.reserved_by != requested_user.user_id {
            self.ensure_administers(&requested_user, space_id).await?;
        }

        if reservation.status != ReservationStatus::Cancelled {
            reservation.cancel(Utc::now());
            self.store(&reservation).await?;
            tracing::info!(reservation_id = %reservation_id, "reservation cancelled");
        }
        Ok(reservation)
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        let Some(space_id) = self
            .kv
            .get::<SpaceId>(&key::reservation_space(reservation_id))
            .await?
        else {
            return Ok(None);
        };
        self.kv
            .get::<ReservationRow>(&key::reservation(space_id, reservation_id))
            .await?
            .map(Reservation::try_from)
            .transpose()
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = self.kv.get_by_prefix(key::RESERVATION_PREFIX).await?;
        let mut reservations = rows
            .into_iter()
            .filter(|r| r.id_usuario == user_id)
            .map(Reservation::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        reservations.sort_by_key(|r| r.span.start());
        Ok(reservations)
    }

    async fn find_by_condominium_id(&self, condominium_id: CondominiumId) -> AppResult<Vec<Reservation>> {
        // 無効化されたスペースの予約も síndico には見せる
        let spaces: Vec<SpaceRow> = self.kv.get_by_prefix(key::SPACE_PREFIX).await?;
        let mut reservations = Vec::new();
        for space in spaces.into_iter().filter(|s| s.id_condominio == condominium_id) {
            reservations.extend(self.find_by_space_id(space.id).await?);
        }
        reservations.sort_by_key(|r| r.span.start());
        Ok(reservations)
    }
}

impl ReservationRepositoryImpl {
    async fn lock_space(&self, space_id: SpaceId) -> OwnedMutexGuard<()> {
        let lock = self.space_locks.entry(space_id).or_default().clone();
        lock.lock_owned().await
    }

    async fn find_by_space_id(&self, space_id: SpaceId) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = self
            .kv
            .get_by_prefix(&key::reservations_of_space(space_id))
            .await?;
        rows.into_iter().map(Reservation::try_from).collect()
    }

    async fn space_id_of(&self, reservation_id: ReservationId) -> AppResult<SpaceId> {
        self.kv
            .get::<SpaceId>(&key::reservation_space(reservation_id))
            .await?
            .ok_or_else(|| reservation_not_found(reservation_id))
    }

    async fn load(&self, space_id: SpaceId, reservation_id: ReservationId) -> AppResult<Reservation> {
        self.kv
            .get::<ReservationRow>(&key::reservation(space_id, reservation_id))
            .await?
            .ok_or_else(|| reservation_not_found(reservation_id))
            .and_then(Reservation::try_from)
    }

    async fn store(&self, reservation: &Reservation) -> AppResult<()> {
        self.kv
            .set(
                &key::reservation(reservation.space_id, reservation.reservation_id),
                &ReservationRow::from(reservation),
            )
            .await
    }

    // 操作者がスペースを所有する condominium の síndico であるか確認する
    async fn ensure_administers(&self, user: &User, space_id: SpaceId) -> AppResult<()> {
        let space: Option<SpaceRow> = self.kv.get(&key::space(space_id)).await?;
        match space {
            Some(s) if user.administers(s.id_condominio) => Ok(()),
            _ => Err(AppError::ForbiddenOperation(format!(
                "user ({}) cannot manage reservations of space ({space_id})",
                user.user_id
            ))),
        }
    }
}

fn reservation_not_found(reservation_id: ReservationId) -> AppError {
    AppError::EntityNotFound(format!("reservation ({reservation_id}) was not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::space::SpaceRepositoryImpl;
    use chrono::{DateTime, TimeZone};
    use kernel::{
        model::{reservation::schedule::TimeSpan, role::Role, space::event::CreateSpace},
        repository::space::SpaceRepository,
    };

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 21, hour, 0, 0).unwrap()
    }

    fn span(start: u32, end: u32) -> TimeSpan {
        TimeSpan::new(at(start), at(end)).unwrap()
    }

    fn user(role: Role, condominium_id: CondominiumId, name: &str) -> User {
        User {
            user_id: UserId::new(),
            user_name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: None,
            role,
            condominium_id: Some(condominium_id),
        }
    }

    struct Fixture {
        repo: Arc<ReservationRepositoryImpl>,
        spaces: SpaceRepositoryImpl,
        condominium_id: CondominiumId,
        space_id: SpaceId,
        admin: User,
        resident: User,
        neighbour: User,
    }

    impl Fixture {
        async fn new() -> Self {
            let kv = KvClient::in_memory();
            let spaces = SpaceRepositoryImpl::new(kv.clone());
            let condominium_id = CondominiumId::new();
            let space = spaces
                .create(CreateSpace {
                    condominium_id,
                    space_name: "Salão de festas".into(),
                    capacity: 50,
                })
                .await
                .unwrap();
            Self {
                repo: Arc::new(ReservationRepositoryImpl::new(kv)),
                spaces,
                condominium_id,
                space_id: space.space_id,
                admin: user(Role::Administrator, condominium_id, "Sindico"),
                resident: user(Role::Resident, condominium_id, "Maria"),
                neighbour: user(Role::Resident, condominium_id, "Joao"),
            }
        }

        async fn reserve(&self, who: &User, start: u32, end: u32) -> AppResult<Reservation> {
            self.repo
                .create(CreateReservation::new(self.space_id, span(start, end), who.clone()))
                .await
        }
    }

    // 指定した prefix のキーへの書き込みだけ失敗するストア
    struct FailingKvStore {
        inner: crate::kv::memory::InMemoryKvStore,
        failing_prefix: &'static str,
    }

    #[async_trait]
    impl crate::kv::KvStore for FailingKvStore {
        async fn get(&self, key: &str) -> AppResult<Option<serde_json::Value>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: serde_json::Value) -> AppResult<()> {
            if key.starts_with(self.failing_prefix) {
                return Err(AppError::SpecificOperationError(sqlx::Error::PoolTimedOut));
            }
            self.inner.set(key, value).await
        }

        async fn delete(&self, key: &str) -> AppResult<()> {
            self.inner.delete(key).await
        }

        async fn get_by_prefix(&self, prefix: &str) -> AppResult<Vec<serde_json::Value>> {
            self.inner.get_by_prefix(prefix).await
        }

        async fn ping(&self) -> bool {
            true
        }
    }

    async fn create_with_failing_write(failing_prefix: &'static str) -> KvClient {
        let kv = KvClient::new(Arc::new(FailingKvStore {
            inner: Default::default(),
            failing_prefix,
        }));
        let condominium_id = CondominiumId::new();
        let space = SpaceRepositoryImpl::new(kv.clone())
            .create(CreateSpace {
                condominium_id,
                space_name: "Sauna".into(),
                capacity: 6,
            })
            .await
            .unwrap();
        let repo = ReservationRepositoryImpl::new(kv.clone());
        let res = repo
            .create(CreateReservation::new(
                space.space_id,
                span(10, 12),
                user(Role::Resident, condominium_id, "Ana"),
            ))
            .await;
        assert!(matches!(res, Err(AppError::SpecificOperationError(_))));
        kv
    }

    #[tokio::test]
    async fn failed_record_write_leaves_no_index_entry() {
        let kv = create_with_failing_write(key::RESERVATION_PREFIX).await;
        let pointers: Vec<SpaceId> = kv.get_by_prefix(key::RESERVATION_SPACE_PREFIX).await.unwrap();
        assert!(pointers.is_empty());
    }

    #[tokio::test]
    async fn failed_index_write_rolls_back_the_record() {
        let kv = create_with_failing_write(key::RESERVATION_SPACE_PREFIX).await;
        let records: Vec<ReservationRow> = kv.get_by_prefix(key::RESERVATION_PREFIX).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn created_reservation_is_pending_with_display_names() {
        let f = Fixture::new().await;
        let r = f.reserve(&f.resident, 10, 12).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.space_name, "Salão de festas");
        assert_eq!(r.requester_name, "Maria");

        let found = f.repo.find_by_id(r.reservation_id).await.unwrap().unwrap();
        assert_eq!(found.reserved_by, f.resident.user_id);
        assert_eq!(found.span, span(10, 12));
    }

    #[tokio::test]
    async fn adjacent_to_confirmed_reservation_succeeds() {
        let f = Fixture::new().await;
        let existing = f.reserve(&f.neighbour, 12, 14).await.unwrap();
        f.repo
            .update_status(UpdateReservationStatus::new(
                existing.reservation_id,
                ReservationStatus::Confirmed,
                f.admin.clone(),
            ))
            .await
            .unwrap();

        assert!(f.reserve(&f.resident, 10, 12).await.is_ok());
        assert!(f.reserve(&f.resident, 14, 16).await.is_ok());
    }

    #[tokio::test]
    async fn overlapping_pending_reservation_conflicts() {
        let f = Fixture::new().await;
        f.reserve(&f.neighbour, 12, 14).await.unwrap();
        let res = f.reserve(&f.resident, 11, 13).await;
        assert!(matches!(res, Err(AppError::ReservationConflict(_))));
    }

    #[tokio::test]
    async fn cancelled_slot_can_be_booked_again() {
        let f = Fixture::new().await;
        let r = f.reserve(&f.neighbour, 12, 14).await.unwrap();
        f.repo
            .cancel(CancelReservation::new(r.reservation_id, f.neighbour.clone()))
            .await
            .unwrap();
        assert!(f.reserve(&f.resident, 12, 14).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_inactive_or_foreign_space_is_not_found() {
        let f = Fixture::new().await;

        let res = f
            .repo
            .create(CreateReservation::new(SpaceId::new(), span(10, 12), f.resident.clone()))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        let outsider = user(Role::Resident, CondominiumId::new(), "Fora");
        let res = f.reserve(&outsider, 10, 12).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        f.spaces
            .delete(kernel::model::space::event::DeleteSpace {
                space_id: f.space_id,
                requested_by: f.condominium_id,
            })
            .await
            .unwrap();
        let res = f.reserve(&f.resident, 10, 12).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn resident_cannot_change_status_in_any_state() {
        let f = Fixture::new().await;
        let r = f.reserve(&f.resident, 10, 12).await.unwrap();

        for status in [ReservationStatus::Confirmed, ReservationStatus::Cancelled] {
            let res = f
                .repo
                .update_status(UpdateReservationStatus::new(r.reservation_id, status, f.resident.clone()))
                .await;
            assert!(matches!(res, Err(AppError::ForbiddenOperation(_))));
        }

        f.repo
            .cancel(CancelReservation::new(r.reservation_id, f.resident.clone()))
            .await
            .unwrap();
        let res = f
            .repo
            .update_status(UpdateReservationStatus::new(
                r.reservation_id,
                ReservationStatus::Confirmed,
                f.resident.clone(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation(_))));
    }

    #[tokio::test]
    async fn administrator_of_another_condominium_is_forbidden() {
        let f = Fixture::new().await;
        let r = f.reserve(&f.resident, 10, 12).await.unwrap();
        let other_admin = user(Role::Administrator, CondominiumId::new(), "Outro");

        let res = f
            .repo
            .update_status(UpdateReservationStatus::new(
                r.reservation_id,
                ReservationStatus::Confirmed,
                other_admin.clone(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation(_))));

        let res = f
            .repo
            .cancel(CancelReservation::new(r.reservation_id, other_admin))
            .await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation(_))));
    }

    #[tokio::test]
    async fn status_update_rules() {
        let f = Fixture::new().await;
        let r = f.reserve(&f.resident, 10, 12).await.unwrap();

        let res = f
            .repo
            .update_status(UpdateReservationStatus::new(
                r.reservation_id,
                ReservationStatus::Pending,
                f.admin.clone(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::InvalidState(_))));

        let res = f
            .repo
            .update_status(UpdateReservationStatus::new(
                ReservationId::new(),
                ReservationStatus::Confirmed,
                f.admin.clone(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        let confirmed = f
            .repo
            .update_status(UpdateReservationStatus::new(
                r.reservation_id,
                ReservationStatus::Confirmed,
                f.admin.clone(),
            ))
            .await
            .unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
        assert!(confirmed.updated_at.is_some());

        let cancelled = f
            .repo
            .update_status(UpdateReservationStatus::new(
                r.reservation_id,
                ReservationStatus::Cancelled,
                f.admin.clone(),
            ))
            .await
            .unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);

        // キャンセル済みの予約は再承認できない
        let res = f
            .repo
            .update_status(UpdateReservationStatus::new(
                r.reservation_id,
                ReservationStatus::Confirmed,
                f.admin.clone(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn cancelling_twice_is_idempotent() {
        let f = Fixture::new().await;
        let r = f.reserve(&f.resident, 10, 12).await.unwrap();

        let first = f
            .repo
            .cancel(CancelReservation::new(r.reservation_id, f.resident.clone()))
            .await
            .unwrap();
        let second = f
            .repo
            .cancel(CancelReservation::new(r.reservation_id, f.resident.clone()))
            .await
            .unwrap();
        assert_eq!(second.status, ReservationStatus::Cancelled);
        assert_eq!(second.cancelled_at, first.cancelled_at);
    }

    #[tokio::test]
    async fn only_requester_or_administrator_can_cancel() {
        let f = Fixture::new().await;
        let r = f.reserve(&f.resident, 10, 12).await.unwrap();

        let res = f
            .repo
            .cancel(CancelReservation::new(r.reservation_id, f.neighbour.clone()))
            .await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation(_))));

        let cancelled = f
            .repo
            .cancel(CancelReservation::new(r.reservation_id, f.admin.clone()))
            .await
            .unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);

        let res = f
            .repo
            .cancel(CancelReservation::new(ReservationId::new(), f.admin.clone()))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn lists_are_filtered_by_owner_and_condominium() {
        let f = Fixture::new().await;
        f.reserve(&f.resident, 14, 16).await.unwrap();
        f.reserve(&f.neighbour, 8, 9).await.unwrap();
        f.reserve(&f.resident, 10, 12).await.unwrap();

        let mine = f.repo.find_by_user_id(f.resident.user_id).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].span, span(10, 12));
        assert_eq!(mine[1].span, span(14, 16));

        let all = f.repo.find_by_condominium_id(f.condominium_id).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].span, span(8, 9));

        let none = f.repo.find_by_condominium_id(CondominiumId::new()).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn no_two_active_reservations_overlap() {
        let f = Fixture::new().await;
        let attempts = [(8, 10), (9, 11), (10, 12), (11, 12), (12, 15), (14, 16), (15, 16), (7, 20)];
        for (start, end) in attempts {
            let _ = f.reserve(&f.resident, start, end).await;
        }

        let all = f.repo.find_by_condominium_id(f.condominium_id).await.unwrap();
        let active: Vec<_> = all.iter().filter(|r| r.status.is_blocking()).collect();
        assert_eq!(active.len(), 4);
        for (i, a) in active.iter().enumerate() {
            for b in &active[i + 1..] {
                assert!(!a.span.overlaps(&b.span));
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_overlapping_requests_admit_exactly_one() {
        let f = Fixture::new().await;
        let mut handles = Vec::new();
        for i in 0..16u32 {
            let repo = f.repo.clone();
            let who = user(Role::Resident, f.condominium_id, &format!("Morador{i}"));
            let request = CreateReservation::new(f.space_id, span(10 + i % 2, 12 + i % 2), who);
            handles.push(tokio::spawn(async move { repo.create(request).await }));
        }

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::ReservationConflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(conflicts, 15);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn request_racing_a_confirmation_is_rejected() {
        let f = Fixture::new().await;
        let r = f.reserve(&f.resident, 12, 14).await.unwrap();

        let confirm = {
            let repo = f.repo.clone();
            let admin = f.admin.clone();
            tokio::spawn(async move {
                repo.update_status(UpdateReservationStatus::new(
                    r.reservation_id,
                    ReservationStatus::Confirmed,
                    admin,
                ))
                .await
            })
        };
        let competing = {
            let repo = f.repo.clone();
            let request = CreateReservation::new(f.space_id, span(13, 15), f.neighbour.clone());
            tokio::spawn(async move { repo.create(request).await })
        };

        assert!(confirm.await.unwrap().is_ok());
        assert!(matches!(
            competing.await.unwrap(),
            Err(AppError::ReservationConflict(_))
        ));
    }
}
