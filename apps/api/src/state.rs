use branchgate_application::PolicyEvaluator;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub policy: PolicyEvaluator,
    pub dev_session_enabled: bool,
}
