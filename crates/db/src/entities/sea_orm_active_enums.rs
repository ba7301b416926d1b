//! Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `blog_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "blog_status")]
pub enum BlogStatus {
    /// Draft.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Published.
    #[sea_orm(string_value = "published")]
    Published,
    /// Archived.
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl From<regdesk_core::blog::BlogStatus> for BlogStatus {
    fn from(status: regdesk_core::blog::BlogStatus) -> Self {
        use regdesk_core::blog::BlogStatus as Domain;
        match status {
            Domain::Draft => Self::Draft,
            Domain::Published => Self::Published,
            Domain::Archived => Self::Archived,
        }
    }
}

impl From<BlogStatus> for regdesk_core::blog::BlogStatus {
    fn from(status: BlogStatus) -> Self {
        match status {
            BlogStatus::Draft => Self::Draft,
            BlogStatus::Published => Self::Published,
            BlogStatus::Archived => Self::Archived,
        }
    }
}
