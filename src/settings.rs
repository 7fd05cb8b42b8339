use crate::common::env::{self, EnvLookup, FromEnv};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::Level;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 3000;

pub struct AppSettings {
    pub level: Level,
    pub app_host: IpAddr,
    pub app_port: u16,

    pub supabase_url: String,
    pub supabase_service_role_key: String,
}

impl AppSettings {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv();
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: &EnvLookup) -> anyhow::Result<Self> {
        let supabase_url = env::read(lookup, "SUPABASE_URL");
        let supabase_service_role_key = env::read(lookup, "SUPABASE_SERVICE_ROLE_KEY");
        let (Some(supabase_url), Some(supabase_service_role_key)) =
            (supabase_url, supabase_service_role_key)
        else {
            anyhow::bail!("Missing SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY in .env");
        };

        let level = Level::from_env_or(lookup, "LOG_LEVEL", Level::INFO)?;
        let app_host = IpAddr::from_env_or(lookup, "APP_HOST", DEFAULT_HOST)?;
        let app_port = u16::from_env_or(lookup, "APP_PORT", DEFAULT_PORT)?;

        Ok(AppSettings {
            level,
            app_host,
            app_port,

            supabase_url,
            supabase_service_role_key,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.app_host, self.app_port)
    }
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("level", &self.level)
            .field("app_host", &self.app_host)
            .field("app_port", &self.app_port)
            .field("supabase_url", &self.supabase_url)
            .field("supabase_service_role_key", &"<redacted>")
            .finish()
    }
}
