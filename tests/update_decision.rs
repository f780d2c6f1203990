#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use lsup::libs::channel::Channel;
    use lsup::libs::config::{Config, ServerConfig, UpdateConfig};
    use lsup::libs::release::ArtifactReleaseInfo;
    use lsup::libs::state::PersistedState;
    use lsup::libs::update::{decide, Decision, StalenessGuard, UpdateError, Updater};
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    struct UpdateTestContext {
        _temp_dir: TempDir,
    }

    impl AsyncTestContext for UpdateTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            UpdateTestContext { _temp_dir: temp_dir }
        }
    }

    fn nightly_info(date: NaiveDate) -> ArtifactReleaseInfo {
        ArtifactReleaseInfo {
            tag: "nightly".to_string(),
            released: date,
            name: "lsup-server-x86_64-unknown-linux-gnu.tar.gz".to_string(),
            download_url: "https://example.invalid/nightly.tar.gz".to_string(),
        }
    }

    #[test]
    fn test_stable_to_stable_is_a_noop() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let decision = decide(Channel::Stable, Channel::Stable, None, now, false).unwrap();
        assert_eq!(decision, Decision::Nothing);
    }

    #[test]
    fn test_nightly_to_stable_reinstalls_from_store() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let installed = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        let decision = decide(Channel::Nightly, Channel::Stable, Some(installed), now, false).unwrap();
        assert_eq!(decision, Decision::ReinstallStable);
    }

    #[test]
    fn test_stable_to_nightly_fetches_without_guard() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let decision = decide(Channel::Stable, Channel::Nightly, None, now, false).unwrap();
        assert_eq!(decision, Decision::FetchNightly { verify_newer: false });
    }

    #[test]
    fn test_fresh_nightly_is_left_alone() {
        // Installed today, checked today: below the 25 hour window.
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 23, 0, 0).unwrap();
        let installed = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let decision = decide(Channel::Nightly, Channel::Nightly, Some(installed), now, false).unwrap();
        assert_eq!(decision, Decision::Nothing);
    }

    #[test]
    fn test_day_old_nightly_is_still_fresh() {
        // One calendar day is 24 hours, which is below the 25 hour window.
        let now = Utc.with_ymd_and_hms(2025, 6, 11, 0, 30, 0).unwrap();
        let installed = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let decision = decide(Channel::Nightly, Channel::Nightly, Some(installed), now, false).unwrap();
        assert_eq!(decision, Decision::Nothing);
    }

    #[test]
    fn test_stale_nightly_fetches_with_guard() {
        let now = Utc.with_ymd_and_hms(2025, 6, 12, 0, 30, 0).unwrap();
        let installed = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let decision = decide(Channel::Nightly, Channel::Nightly, Some(installed), now, false).unwrap();
        assert_eq!(decision, Decision::FetchNightly { verify_newer: true });
    }

    #[test]
    fn test_force_skips_the_staleness_window() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let installed = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let decision = decide(Channel::Nightly, Channel::Nightly, Some(installed), now, true).unwrap();
        assert_eq!(decision, Decision::FetchNightly { verify_newer: true });
    }

    #[test]
    fn test_nightly_without_persisted_date_is_fatal() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let error = decide(Channel::Nightly, Channel::Nightly, None, now, false).unwrap_err();
        assert_eq!(error.downcast::<UpdateError>().unwrap(), UpdateError::MissingReleaseDate);
    }

    #[test_context(UpdateTestContext)]
    #[test]
    fn test_guard_allows_a_newer_release(_ctx: &mut UpdateTestContext) {
        let state = PersistedState::new().unwrap();
        let observed = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        state.set_release_date(Some(observed)).unwrap();

        let guard = StalenessGuard::new(&state, Some(observed));
        let fetched = nightly_info(NaiveDate::from_ymd_opt(2025, 6, 12).unwrap());
        assert!(guard.check(&fetched).unwrap());
    }

    #[test_context(UpdateTestContext)]
    #[test]
    fn test_guard_aborts_silently_when_not_newer(_ctx: &mut UpdateTestContext) {
        let state = PersistedState::new().unwrap();
        let observed = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        state.set_release_date(Some(observed)).unwrap();

        let guard = StalenessGuard::new(&state, Some(observed));
        let fetched = nightly_info(observed);
        // Equal dates: no install, no error
        assert!(!guard.check(&fetched).unwrap());
    }

    #[test_context(UpdateTestContext)]
    #[test]
    fn test_guard_fails_when_another_instance_raced(_ctx: &mut UpdateTestContext) {
        let state = PersistedState::new().unwrap();
        let observed = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        state.set_release_date(Some(observed)).unwrap();

        let guard = StalenessGuard::new(&state, Some(observed));
        // Another process advances the persisted date mid-flight
        state.set_release_date(NaiveDate::from_ymd_opt(2025, 6, 11)).unwrap();

        let fetched = nightly_info(NaiveDate::from_ymd_opt(2025, 6, 12).unwrap());
        let error = guard.check(&fetched).unwrap_err();
        assert_eq!(error.downcast::<UpdateError>().unwrap(), UpdateError::ConcurrentStateChange);
    }

    #[test_context(UpdateTestContext)]
    #[test]
    fn test_second_invocation_is_rejected_while_in_flight(_ctx: &mut UpdateTestContext) {
        let updater = Updater::new(false).unwrap();

        let first = updater.try_begin();
        assert!(first.is_some());
        // A nested invocation must be rejected, not interleaved
        assert!(updater.try_begin().is_none());

        drop(first);
        assert!(updater.try_begin().is_some());
    }

    #[test_context(UpdateTestContext)]
    #[tokio::test]
    async fn test_explicit_server_path_opts_out_of_updates(_ctx: &mut UpdateTestContext) {
        // Nightly is desired, but a user-supplied binary is configured
        let config = Config {
            server: Some(ServerConfig {
                path: Some("/opt/custom/lsup-server".to_string()),
                ..Default::default()
            }),
            update: Some(UpdateConfig {
                channel: Channel::Nightly,
                ..Default::default()
            }),
        };
        config.save().unwrap();

        let updater = Updater::new(false).unwrap();
        // Returns without prompting, fetching, or touching state
        updater.run().await.unwrap();

        let state = PersistedState::new().unwrap();
        assert_eq!(state.release_tag().unwrap(), None);
        assert_eq!(state.release_date().unwrap(), None);
    }

    #[test_context(UpdateTestContext)]
    #[tokio::test]
    async fn test_stable_installation_clears_lingering_nightly_date(_ctx: &mut UpdateTestContext) {
        let state = PersistedState::new().unwrap();
        // No tag persisted, so the current channel is stable, yet a nightly
        // release date was left behind
        state.set_release_date(NaiveDate::from_ymd_opt(2025, 6, 10)).unwrap();

        let updater = Updater::new(false).unwrap();
        updater.run().await.unwrap();

        assert_eq!(state.release_date().unwrap(), None);
    }

    #[test_context(UpdateTestContext)]
    #[test]
    fn test_current_channel_derivation(_ctx: &mut UpdateTestContext) {
        let updater = Updater::new(false).unwrap();
        // No tag persisted yet: a fresh installation counts as stable
        assert_eq!(updater.current_channel().unwrap(), Channel::Stable);

        let state = PersistedState::new().unwrap();
        state.set_release_tag(Some("nightly".to_string())).unwrap();
        assert_eq!(updater.current_channel().unwrap(), Channel::Nightly);

        state.set_release_tag(Some("1.4.20250610".to_string())).unwrap();
        assert_eq!(updater.current_channel().unwrap(), Channel::Stable);
    }
}
