//! Request extractors whose rejections use the error body of every other
//! failure: `{"Error": true, "Code": 400, "Message": ...}`.

mod json;
mod path;
mod query;
mod validated_json;

pub use self::json::Json;
pub use self::path::Path;
pub use self::query::Query;
pub use self::validated_json::ValidateJson;

/// Shortens rejection details before they are logged as error context.
fn sanitize_error_message(message: &str) -> String {
    let lines = message.lines().take(3).collect::<Vec<_>>();
    lines.join(" ").chars().take(200).collect()
}
