//! `SeaORM` entities.

pub mod blogs;
pub mod sea_orm_active_enums;
