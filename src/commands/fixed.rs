use crate::error::CommandError;
use crate::lifecycle::AppState;

/// Serve a previously generated corrected document by file name.
pub async fn get_fixed_page(state: &AppState, name: String) -> Result<String, CommandError> {
    state.fixed_pages.load(&name).await.map_err(|e| {
        log::warn!("Fixed page {:?} unavailable: {}", name, e);
        CommandError::from(e)
    })
}
