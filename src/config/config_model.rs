#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub supabase: Supabase,
    pub vip: Vip,
    pub chat: Chat,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Supabase {
    pub jwt_secret: String,
}

#[derive(Debug, Clone)]
pub struct Vip {
    pub entitlement_cache_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct Chat {
    pub send_max_per_minute: i32,
}
