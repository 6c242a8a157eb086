use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::model::{CharacterPage, CharacterQuery};
use crate::{
    AppState,
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

// 获取 Earth 来源角色列表
pub async fn get_characters(
    State(state): State<AppState>,
    Query(query): Query<CharacterQuery>,
) -> Response {
    let (page, size) = match query.validate() {
        Ok(bounds) => bounds,
        Err(msg) => {
            return (
                StatusCode::BAD_REQUEST,
                error_to_api_response::<()>(error_codes::VALIDATION_ERROR, msg),
            )
                .into_response();
        }
    };

    match state.characters.get_aggregate().await {
        Ok(characters) => {
            let result = CharacterPage::build(characters, &query, page, size);
            (StatusCode::OK, success_to_api_response(result)).into_response()
        }
        Err(e) => {
            tracing::error!("Error in get_characters endpoint: {}", e);
            e.into_response()
        }
    }
}
