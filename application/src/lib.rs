pub mod consulting_service;
pub mod knowledge_service;
pub mod providers;
