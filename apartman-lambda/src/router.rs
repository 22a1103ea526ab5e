use http::StatusCode;
use lambda_http::RequestExt;
use lambda_http::{Body, Request, Response};

use apartman_shared::utilities::requests::extract_body;
use apartman_shared::utilities::responses::{response_with_code, success_response};

use crate::endpoints::{admin, status, tokens};

const GET: &str = "GET";
const POST: &str = "POST";

pub async fn handle_lambda(event: Request) -> Result<Response<Body>, lambda_http::Error> {
    let raw_path = event.raw_http_path();
    let path = raw_path
        .strip_prefix("/dev")
        .or_else(|| raw_path.strip_prefix("/prod"))
        .unwrap_or(&raw_path);

    log::info!("Received request for path: {}", path);
    let event_body = extract_body(&event);

    match (event.method().as_str(), path) {
        //Monitor
        (GET, "/status") => success_response(status::handle().await),

        //Admin
        (POST, "/admin/set-admin-role") => admin::set_admin_role::handler(event, event_body).await,
        (POST, "/admin/delete-auth-user") => admin::delete_user::handler(event, event_body).await,
        (POST, "/admin/update-password") => admin::update_password::handler(event, event_body).await,
        (POST, "/admin/update-phone") => admin::update_phone::handler(event, event_body).await,
        (POST, "/admin/update-fee") => admin::update_fee::handler(event, event_body).await,

        //Device tokens
        (POST, "/tokens/register") => tokens::register::handler(event, event_body).await,

        //Not found
        _ => response_with_code("Not Found", StatusCode::NOT_FOUND),
    }
}
