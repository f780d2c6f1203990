#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use lsup::libs::state::PersistedState;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct StateTestContext {
        _temp_dir: TempDir,
    }

    impl TestContext for StateTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            StateTestContext { _temp_dir: temp_dir }
        }
    }

    #[test_context(StateTestContext)]
    #[test]
    fn test_fresh_state_is_empty(_ctx: &mut StateTestContext) {
        let state = PersistedState::new().unwrap();
        assert_eq!(state.release_date().unwrap(), None);
        assert_eq!(state.release_tag().unwrap(), None);
    }

    #[test_context(StateTestContext)]
    #[test]
    fn test_set_and_get_release_fields(_ctx: &mut StateTestContext) {
        let state = PersistedState::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 8, 30).unwrap();

        state.set_release_date(Some(date)).unwrap();
        state.set_release_tag(Some("nightly".to_string())).unwrap();

        assert_eq!(state.release_date().unwrap(), Some(date));
        assert_eq!(state.release_tag().unwrap(), Some("nightly".to_string()));
    }

    #[test_context(StateTestContext)]
    #[test]
    fn test_state_survives_reopening(_ctx: &mut StateTestContext) {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        {
            let state = PersistedState::new().unwrap();
            state.set_release_date(Some(date)).unwrap();
            state.set_release_tag(Some("1.4.20250102".to_string())).unwrap();
        }

        // A fresh accessor sees the same durable values
        let state = PersistedState::new().unwrap();
        assert_eq!(state.release_date().unwrap(), Some(date));
        assert_eq!(state.release_tag().unwrap(), Some("1.4.20250102".to_string()));
    }

    #[test_context(StateTestContext)]
    #[test]
    fn test_clearing_release_date_keeps_tag(_ctx: &mut StateTestContext) {
        let state = PersistedState::new().unwrap();
        state.set_release_date(NaiveDate::from_ymd_opt(2025, 5, 5)).unwrap();
        state.set_release_tag(Some("1.2.20250505".to_string())).unwrap();

        state.set_release_date(None).unwrap();

        assert_eq!(state.release_date().unwrap(), None);
        assert_eq!(state.release_tag().unwrap(), Some("1.2.20250505".to_string()));
    }

    #[test_context(StateTestContext)]
    #[test]
    fn test_writes_from_one_accessor_visible_to_another(_ctx: &mut StateTestContext) {
        // Two accessors over the same durable store, as two process
        // instances would have.
        let writer = PersistedState::new().unwrap();
        let reader = PersistedState::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();

        assert_eq!(reader.release_date().unwrap(), None);
        writer.set_release_date(Some(date)).unwrap();
        assert_eq!(reader.release_date().unwrap(), Some(date));
    }
}
