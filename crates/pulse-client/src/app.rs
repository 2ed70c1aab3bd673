use std::sync::Arc;

use pulse_analytics::{
    AnalystOverview, MovieComparison, MovieReport, SentimentBreakdown, analyst_overview, compare,
    movie_report, rating_distribution, search, sentiment_breakdown,
};
use pulse_store::{Clock, DefaultClock, RecordStore, SessionSnapshot, SnapshotStore};
use pulse_types::api::{LoginRequest, SignupRequest};
use pulse_types::{Catalog, CatalogEntry, FeedbackRecord, Identity, MirrorEvent, Role};
use tracing::{error, info, warn};

use crate::catalog::{AdminRow, CatalogOverlay, CategoryFilter};
use crate::cheers::random_cheer;
use crate::config::ClientConfig;
use crate::error::{AppError, Result};
use crate::mirror::{HttpMirror, MirrorHandle};
use crate::navigation::{Navigator, Page};
use crate::session::{Action, ProfileUpdate, RolePolicy, Session};

/// A freshly posted review and the message shown for it.
#[derive(Debug, Clone)]
pub struct Submission {
    pub record: FeedbackRecord,
    pub cheer: &'static str,
}

/// Composition root. Owns every piece of client state; views talk to this
/// and nothing else.
pub struct App {
    catalog: Catalog,
    store: RecordStore,
    session: Session,
    overlay: CatalogOverlay,
    navigator: Navigator,
    snapshots: SnapshotStore,
    mirror: Option<MirrorHandle>,
    clock: Arc<dyn Clock>,
}

impl App {
    pub fn new(snapshots: SnapshotStore, mirror: Option<MirrorHandle>) -> Result<Self> {
        Self::with_clock(snapshots, mirror, Arc::new(DefaultClock))
    }

    /// Restore identity, overlays and checkpointed feedback from `snapshots`.
    pub fn with_clock(
        snapshots: SnapshotStore,
        mirror: Option<MirrorHandle>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let snapshot = snapshots.load()?;
        let mut store = RecordStore::with_clock(clock.clone());
        store.replace_all(snapshots.load_feedback()?);

        let session = Session::restore(snapshot.identity);
        let navigator = Navigator::resume(&session);
        info!(
            records = store.len(),
            signed_in = session.is_signed_in(),
            "client state restored"
        );

        Ok(Self {
            catalog: Catalog::seeded(),
            store,
            session,
            overlay: CatalogOverlay::restore(snapshot.hidden_ids, snapshot.featured_ids),
            navigator,
            snapshots,
            mirror,
            clock,
        })
    }

    /// Open the snapshot file and, when enabled, start the HTTP mirror. The
    /// mirror needs a running tokio runtime; without one the app runs local-only.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let snapshots = SnapshotStore::open(&config.snapshot_path)?;
        let mirror = if config.mirror_enabled {
            match HttpMirror::new(config.api_base.clone(), config.mirror_timeout) {
                Ok(http) => MirrorHandle::spawn(Arc::new(http)),
                Err(e) => {
                    warn!("Remote mirror disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };
        Self::new(snapshots, mirror)
    }

    /// Merge the remote listing into local feedback. The pull runs after every
    /// queued mirror event; local creates, edits and deletes always win.
    /// Returns whether the pull succeeded; on failure local state is kept.
    pub async fn sync_from_remote(&mut self) -> bool {
        let Some(mirror) = &self.mirror else {
            return false;
        };
        match mirror.pull().await {
            Ok(records) => {
                let pulled = records.len();
                let added = self.store.merge_remote(records);
                info!(pulled, added, "Merged feedback from remote");
                self.checkpoint();
                true
            }
            Err(e) => {
                warn!("Remote pull failed, keeping local feedback: {}", e);
                false
            }
        }
    }

    /// Wait for queued mirror events to be attempted.
    pub async fn flush_mirror(&self) {
        if let Some(mirror) = &self.mirror {
            mirror.flush().await;
        }
    }

    // -- Session intents --

    pub fn login(&mut self, role: Role, email: &str, password: &str) -> Result<Identity> {
        let identity = self.session.login(role, email, password)?.clone();
        self.navigator = Navigator::resume(&self.session);
        self.persist_session();
        self.mirror(MirrorEvent::SignedIn(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }));
        Ok(identity)
    }

    pub fn signup(&mut self, role: Role, name: &str, email: &str, password: &str) -> Result<Identity> {
        let identity = self.session.signup(role, name, email, password)?.clone();
        self.navigator = Navigator::resume(&self.session);
        self.persist_session();
        self.mirror(MirrorEvent::SignedUp(SignupRequest {
            id: Some(identity.id.clone()),
            name: identity.name.clone(),
            email: identity.email.clone(),
            password: password.to_string(),
            role,
        }));
        Ok(identity)
    }

    pub fn sign_out(&mut self) -> Option<Identity> {
        let previous = self.session.sign_out();
        self.navigator.reset();
        self.persist_session();
        previous
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<Identity> {
        let identity = self.session.update_profile(update)?.clone();
        self.persist_session();
        Ok(identity)
    }

    // -- Feedback intents --

    pub fn submit_feedback(&mut self, movie_id: &str, rating: i64, text: &str) -> Result<Submission> {
        let author = self.session.authorize(Action::SubmitFeedback)?.clone();
        self.visible_entry(movie_id)?;

        let record = self
            .store
            .submit(movie_id, &author.id, &author.name, rating, text)?;
        self.checkpoint();
        self.mirror(MirrorEvent::FeedbackCreated(record.clone()));

        Ok(Submission {
            record,
            cheer: random_cheer(),
        })
    }

    /// Authors only. Unknown ids are `NotFound`.
    pub fn edit_feedback(&mut self, id: &str, rating: i64, text: &str) -> Result<FeedbackRecord> {
        let author_id = self.session.authorize(Action::EditOwnFeedback)?.id.clone();
        let existing = self
            .store
            .get(id)
            .ok_or_else(|| AppError::feedback_not_found(id))?;
        if existing.user_id != author_id {
            return Err(AppError::NotAuthor { id: id.to_string() });
        }

        let record = self.store.edit(id, rating, text)?;
        self.checkpoint();
        self.mirror(MirrorEvent::FeedbackUpdated {
            id: record.id.clone(),
            rating: record.rating(),
            text: record.text.clone(),
        });
        Ok(record)
    }

    /// Admins may delete anything, audience members only their own reviews.
    /// Deleting an unknown id is a no-op returning `false`.
    pub fn delete_feedback(&mut self, id: &str) -> Result<bool> {
        let identity = self.session.identity().ok_or(AppError::NotSignedIn)?;
        if !identity.role.permits(Action::DeleteAnyFeedback) {
            let identity = self.session.authorize(Action::DeleteOwnFeedback)?;
            if let Some(existing) = self.store.get(id) {
                if existing.user_id != identity.id {
                    return Err(AppError::NotAuthor { id: id.to_string() });
                }
            }
        }

        if !self.store.remove(id) {
            return Ok(false);
        }
        self.checkpoint();
        self.mirror(MirrorEvent::FeedbackDeleted { id: id.to_string() });
        Ok(true)
    }

    // -- Catalog intents --

    pub fn toggle_hidden(&mut self, movie_id: &str) -> Result<bool> {
        self.session.authorize(Action::ToggleCatalogOverlay)?;
        let hidden = self.overlay.toggle_hidden(&self.catalog, movie_id)?;
        self.persist_session();
        Ok(hidden)
    }

    pub fn toggle_featured(&mut self, movie_id: &str) -> Result<bool> {
        self.session.authorize(Action::ToggleCatalogOverlay)?;
        let featured = self.overlay.toggle_featured(&self.catalog, movie_id)?;
        self.persist_session();
        Ok(featured)
    }

    // -- Navigation --

    pub fn navigate(&mut self, page: Page) -> Result<&Page> {
        if let Page::MovieDetails(movie_id) = &page {
            self.visible_entry(movie_id)?;
        }
        self.navigator.navigate(page, &self.session)
    }

    pub fn back(&mut self) -> &Page {
        self.navigator.back()
    }

    pub fn cancel_sign_out(&mut self) -> &Page {
        self.navigator.cancel_sign_out()
    }

    pub fn current_page(&self) -> &Page {
        self.navigator.current()
    }

    // -- Reads --

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }

    pub fn overlay(&self) -> &CatalogOverlay {
        &self.overlay
    }

    /// Everything in the store, including reviews of titles no longer in
    /// the catalog.
    pub fn all_feedback(&self) -> &[FeedbackRecord] {
        self.store.records()
    }

    pub fn feedback_for(&self, movie_id: &str) -> Vec<&FeedbackRecord> {
        self.live_records().filter(|r| r.movie_id == movie_id).collect()
    }

    pub fn movie_pulse(&self, movie_id: &str) -> Result<SentimentBreakdown> {
        self.entry(movie_id)?;
        Ok(sentiment_breakdown(
            self.live_records().filter(|r| r.movie_id == movie_id),
        ))
    }

    /// Star histogram for a title, one-star reviews first.
    pub fn star_counts(&self, movie_id: &str) -> Result<[usize; 5]> {
        self.entry(movie_id)?;
        Ok(rating_distribution(
            self.live_records().filter(|r| r.movie_id == movie_id),
        ))
    }

    pub fn analyst_overview(&self) -> Result<AnalystOverview> {
        self.session.authorize(Action::ViewAnalytics)?;
        Ok(analyst_overview(self.live_records(), self.today()))
    }

    pub fn producer_report(&self, movie_id: &str) -> Result<MovieReport> {
        self.session.authorize(Action::ViewProducerReports)?;
        let entry = self.entry(movie_id)?;
        Ok(movie_report(entry, self.live_records()))
    }

    pub fn compare_titles(&self, left: &str, right: &str) -> Result<MovieComparison> {
        Ok(compare(self.producer_report(left)?, self.producer_report(right)?))
    }

    pub fn moderation_search(&self, term: &str) -> Result<Vec<&FeedbackRecord>> {
        self.session.authorize(Action::ViewAdminConsole)?;
        Ok(search(self.live_records(), term))
    }

    pub fn audience_listing(&self, filter: CategoryFilter) -> Vec<&CatalogEntry> {
        self.overlay.audience_listing(&self.catalog, filter)
    }

    pub fn admin_listing(&self) -> Result<Vec<AdminRow<'_>>> {
        self.session.authorize(Action::ViewAdminConsole)?;
        Ok(self.overlay.admin_listing(&self.catalog))
    }

    // -- Internals --

    /// Feedback whose movie is still in the catalog.
    fn live_records(&self) -> impl Iterator<Item = &FeedbackRecord> {
        self.store
            .records()
            .iter()
            .filter(|r| self.catalog.contains(&r.movie_id))
    }

    fn entry(&self, movie_id: &str) -> Result<&CatalogEntry> {
        self.catalog
            .find(movie_id)
            .ok_or_else(|| AppError::movie_not_found(movie_id))
    }

    fn visible_entry(&self, movie_id: &str) -> Result<&CatalogEntry> {
        if self.overlay.is_hidden(movie_id) {
            return Err(AppError::movie_not_found(movie_id));
        }
        self.entry(movie_id)
    }

    fn today(&self) -> chrono::NaiveDate {
        self.clock.utc().date_naive()
    }

    fn persist_session(&self) {
        let snapshot = SessionSnapshot {
            identity: self.session.identity().cloned(),
            hidden_ids: self.overlay.hidden_ids(),
            featured_ids: self.overlay.featured_ids(),
        };
        if let Err(e) = self.snapshots.save(&snapshot) {
            error!("Failed to save session snapshot: {}", e);
        }
    }

    fn checkpoint(&self) {
        if let Err(e) = self.snapshots.checkpoint_feedback(self.store.records()) {
            error!("Failed to checkpoint feedback: {}", e);
        }
    }

    fn mirror(&self, event: MirrorEvent) {
        if let Some(mirror) = &self.mirror {
            mirror.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pulse_store::ManualClock;

    fn app() -> App {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 7, 10, 0, 0).unwrap()));
        App::with_clock(SnapshotStore::open_in_memory().unwrap(), None, clock).unwrap()
    }

    #[test]
    fn starts_signed_out_on_landing() {
        let app = app();
        assert!(app.identity().is_none());
        assert_eq!(app.current_page(), &Page::Landing);
        assert!(app.all_feedback().is_empty());
    }

    #[test]
    fn login_moves_to_role_home() {
        let mut app = app();
        app.login(Role::Producer, "studio@gmail.com", "secret").unwrap();
        assert_eq!(app.current_page(), &Page::ProducerDashboard);
    }

    #[test]
    fn submit_requires_visible_known_movie() {
        let mut app = app();
        app.login(Role::User, "fan@gmail.com", "secret").unwrap();
        assert!(matches!(
            app.submit_feedback("zz", 5, "?"),
            Err(AppError::NotFound { what: "movie", .. })
        ));
        assert!(app.all_feedback().is_empty());
    }

    #[test]
    fn dangling_feedback_is_kept_but_not_counted() {
        let mut app = app();
        app.login(Role::User, "fan@gmail.com", "secret").unwrap();
        app.submit_feedback("t1", 5, "mass").unwrap();
        let orphan = FeedbackRecord::new(
            "old",
            "retired",
            "u9",
            "Old Fan",
            pulse_types::Rating::new(1).unwrap(),
            "gone",
            Utc.with_ymd_and_hms(2024, 6, 6, 9, 0, 0).unwrap(),
        );
        let mut records = app.all_feedback().to_vec();
        records.push(orphan);
        app.store.replace_all(records);

        assert_eq!(app.all_feedback().len(), 2);
        app.sign_out();
        app.login(Role::Analyst, "lens@gmail.com", "secret").unwrap();
        let overview = app.analyst_overview().unwrap();
        assert_eq!(overview.total, 1);
        assert_eq!(overview.breakdown.negative.count, 0);
    }

    #[test]
    fn movie_pulse_rejects_unknown_title() {
        let app = app();
        assert!(app.movie_pulse("nope").is_err());
        assert!(app.movie_pulse("t1").unwrap().is_empty());
        assert_eq!(app.star_counts("t1").unwrap(), [0; 5]);
    }
}
