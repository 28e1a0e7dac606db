use anyhow::{Context, Result};

use super::config_model::{Chat, Database, DotEnvyConfig, Server, Supabase, Vip};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .context("SERVER_PORT is invalid")?
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .context("SERVER_BODY_LIMIT is invalid")?
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .context("SERVER_TIMEOUT is invalid")?
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").context("DATABASE_URL is invalid")?,
    };

    let supabase = Supabase {
        jwt_secret: std::env::var("SUPABASE_JWT_SECRET")
            .context("SUPABASE_JWT_SECRET is invalid")?,
    };

    let vip = Vip {
        entitlement_cache_seconds: std::env::var("VIP_ENTITLEMENT_CACHE_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()?,
    };

    let chat = Chat {
        send_max_per_minute: std::env::var("CHAT_SEND_MAX_PER_MINUTE")
            .unwrap_or_else(|_| "30".to_string())
            .parse()?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        supabase,
        vip,
        chat,
    })
}

pub fn get_supabase_jwt_secret() -> Result<String> {
    dotenvy::dotenv().ok();

    std::env::var("SUPABASE_JWT_SECRET").context("SUPABASE_JWT_SECRET is invalid")
}
