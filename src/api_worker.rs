use crate::api::StudyApi;
use crate::models::{ApiRequest, ApiResponse};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Drain `requests`, running each one on its own task so a slow call never
/// holds up the ones behind it. Responses come back in completion order.
pub fn spawn_api_worker(
    api: Arc<dyn StudyApi>,
    mut requests: UnboundedReceiver<ApiRequest>,
    responses: UnboundedSender<ApiResponse>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            debug!(?request, "worker received request");
            let api = Arc::clone(&api);
            let responses = responses.clone();
            tokio::spawn(async move {
                let response = execute(api.as_ref(), request).await;
                if responses.send(response).is_err() {
                    debug!("response channel closed, dropping response");
                }
            });
        }
        debug!("request channel closed, api worker exiting");
    })
}

pub async fn execute(api: &dyn StudyApi, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::Categories => {
            let result = api.categories().await;
            if let Err(e) = &result {
                warn!("loading categories failed: {e}");
            }
            ApiResponse::Categories(result)
        }
        ApiRequest::Flashcards { ticket, query } => {
            let result = api.questions(&query).await;
            if let Err(e) = &result {
                warn!(category = %query.category, "loading flashcards failed: {e}");
            }
            ApiResponse::Flashcards { ticket, result }
        }
        ApiRequest::Test { ticket, query } => {
            let result = api.questions(&query).await;
            if let Err(e) = &result {
                warn!(category = %query.category, "loading test failed: {e}");
            }
            ApiResponse::Test { ticket, result }
        }
        ApiRequest::Check { ticket, row, body } => {
            let result = api.check(&body).await;
            if let Err(e) = &result {
                warn!(row, "checking answer failed: {e}");
            }
            ApiResponse::Check { ticket, row, result }
        }
    }
}
