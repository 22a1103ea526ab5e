use dotenv::dotenv;
use std::env;

/// Initialize dotenv (only needs to be called once at startup)
pub fn init() {
    if dotenv().is_ok() {
        println!("Loaded .env file");
    } else {
        println!("Failed to load .env file");
    }
}

/// Fetch environment variables by key
pub fn get_env_var(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("Environment variable {} must be set", key))
}

//Get table names
pub fn get_users_table() -> String {
    get_env_var("USERS_TABLE_NAME")
}

pub fn get_tokens_table() -> String {
    get_env_var("FCM_TOKENS_TABLE_NAME")
}

pub fn get_payments_table() -> String {
    get_env_var("PAYMENTS_TABLE_NAME")
}

pub fn get_announcements_table() -> String {
    get_env_var("ANNOUNCEMENTS_TABLE_NAME")
}

pub fn get_settings_table() -> String {
    get_env_var("SETTINGS_TABLE_NAME")
}

pub fn get_logs_table() -> String {
    get_env_var("LOGS_TABLE_NAME")
}

pub fn get_notification_logs_table() -> String {
    get_env_var("NOTIFICATION_LOGS_TABLE_NAME")
}

/// Path of the Firebase service account key used for FCM sends
pub fn get_service_account_path() -> String {
    get_env_var("FIREBASE_SERVICE_ACCOUNT_PATH")
}

pub fn get_user_pool_id() -> String {
    get_env_var("COGNITO_USER_POOL_ID")
}

pub fn get_aws_region() -> String {
    get_env_var("AWS_REGION")
}

/// Domain appended to the phone-derived login identity
pub fn get_login_email_domain() -> String {
    env::var("LOGIN_EMAIL_DOMAIN").unwrap_or_else(|_| "apartman-yonetim.com".to_string())
}
