pub mod groq;
pub mod models;
