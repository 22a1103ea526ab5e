use serde_json::{json, Value};

pub async fn handle() -> Value {
    json!({
        "service": "apartman-lambda",
        "version": env!("CARGO_PKG_VERSION"),
    })
}
