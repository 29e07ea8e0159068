use educonnect_core::{
    errors::{EduError, EduResult},
    models::{
        directory::{DirectoryQuery, SearchQuery},
        user::{Role, UserProfile},
    },
};
use educonnect_db::Store;

use crate::middleware::auth::{Caller, Operation, authorize};

/// Role-scoped directory search. The scope comes from the caller's stored
/// role; a `role` parameter is only accepted if it agrees with it.
pub async fn search(
    store: &dyn Store,
    caller: &Caller,
    params: SearchQuery,
) -> EduResult<Vec<UserProfile>> {
    authorize(Some(caller.role), Operation::SearchDirectory)?;

    if let Some(requested) = params.role.as_deref() {
        let requested: Role = requested.parse()?;
        if requested != caller.role {
            return Err(EduError::InvalidRole(format!(
                "{requested} does not match the caller's role"
            )));
        }
    }

    let query = DirectoryQuery::for_caller(caller.role, &params.query)?;
    let matches = store.search_users(&query).await?;

    Ok(matches.into_iter().map(UserProfile::from).collect())
}
