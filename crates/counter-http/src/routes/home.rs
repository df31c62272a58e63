use axum::Json;

use crate::middleware::request_count::RequestCount;
use crate::types::HomeResponse;

/// Reports the window count this request produced.
pub async fn home(RequestCount(count): RequestCount) -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "status is ok".to_string(),
        count,
    })
}
