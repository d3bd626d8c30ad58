use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::core::effectiveness::{ReconcileOptions, TypeEffectiveness};
use crate::data::type_chart::{DamageRelations, TypeChart};
use crate::error::{EngineError, Result};
use crate::service::TypeRelationService;

/// Resolves effectiveness from the relation service, fetching every type
/// concurrently.
///
/// A type whose fetch is `Unavailable` is read from `fallback` when one is
/// given. Any other failure is returned as is.
pub async fn resolve_remote(
    service: Arc<dyn TypeRelationService>,
    types: &[String],
    fallback: Option<&TypeChart>,
    options: ReconcileOptions,
) -> Result<TypeEffectiveness> {
    let mut tasks = JoinSet::new();
    for (index, type_name) in types.iter().enumerate() {
        let service = Arc::clone(&service);
        let type_name = type_name.clone();
        tasks.spawn(async move {
            let result = service.fetch_type_relations(&type_name).await;
            (index, type_name, result)
        });
    }

    let mut fetched: Vec<Option<Result<DamageRelations>>> = vec![None; types.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, type_name, result) =
            joined.map_err(|e| EngineError::unavailable("type relations", e))?;
        debug!(%type_name, ok = result.is_ok(), "type relations fetched");
        fetched[index] = Some(result);
    }

    let mut relations = Vec::with_capacity(types.len());
    for (type_name, result) in types.iter().zip(fetched) {
        let result = result.unwrap_or_else(|| Err(EngineError::unavailable(type_name, "task did not complete")));
        match (result, fallback) {
            (Ok(relation), _) => relations.push(relation),
            (Err(err), Some(chart)) if err.is_transient() => {
                warn!(%type_name, error = %err, "relation service unavailable, using static chart");
                relations.push(chart.relations(type_name)?.clone());
            }
            (Err(err), _) => return Err(err),
        }
    }

    Ok(TypeEffectiveness::union(relations.iter()).reconciled(options))
}
