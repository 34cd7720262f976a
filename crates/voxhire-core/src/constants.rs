//! Application-wide constants

/// Application directories and files
pub mod app {
    /// Config directory name under the user's home (~/.voxhire)
    pub const CONFIG_DIR_NAME: &str = ".voxhire";
    /// SQLite database file name
    pub const DB_FILE_NAME: &str = "voxhire.db";
}

/// Request governor tuning
pub mod governor {
    /// Minimum spacing between calls on the quota-constrained tier.
    /// 3 RPM comes out to one request every 20 s; 22 s leaves headroom.
    pub const STRICT_COOLDOWN_MS: u64 = 22_000;
    /// Minimum spacing between calls on the high-throughput tier.
    pub const FAST_COOLDOWN_MS: u64 = 1_000;
    /// Extra attempts granted to a job that hit provider throttling.
    pub const MAX_RETRIES: u32 = 1;
}

/// LLM provider endpoints and models
pub mod ai {
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
    pub const OPENAI_MODEL: &str = "gpt-4o-mini";
    pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
    /// Groq API keys carry this prefix; used for provider auto-detection.
    pub const GROQ_KEY_PREFIX: &str = "gsk_";
}

/// Interview session structure
pub mod interview {
    /// Questions asked per session.
    pub const TOTAL_ROUNDS: u32 = 8;
    /// Question number at which the session switches to coding challenges.
    pub const CODING_ROUND_START: u32 = 6;
}
