#![allow(dead_code)]

use chrono::NaiveDate;
use console_lib::adapters::{MemorySessionSlot, StaticSeed};
use console_lib::config::Config;
use console_lib::console::ConsoleContext;
use recordkeep_core::domain::{Category, Company, Person, Record, Role, SeedData, Severity, User};
use recordkeep_core::ports::SessionSlot;
use std::sync::Arc;

pub fn user(id: u64, username: &str, password: &str, role: Role) -> User {
    User {
        id,
        username: username.to_string(),
        password: password.to_string(),
        name: format!("{} account", username),
        role,
    }
}

/// Three accounts, one of each entity and a record pointing at all of them.
pub fn seed() -> SeedData {
    SeedData {
        users: vec![
            user(1, "admin", "admin123", Role::Admin),
            user(2, "moderator", "mod123", Role::Moderator),
            user(3, "viewer", "user123", Role::User),
        ],
        persons: vec![Person {
            id: 1,
            firstname: "John".into(),
            lastname: "Smith".into(),
            address: "12 Harbour Street".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1984, 3, 12),
            contact: "john@example.com".into(),
            notes: String::new(),
        }],
        companies: vec![Company {
            id: 1,
            name: "Northwind".into(),
            address: "1 Market Square".into(),
            contact: "info@northwind.example".into(),
        }],
        categories: vec![Category {
            id: 1,
            name: "Fraud".into(),
        }],
        records: vec![Record {
            id: 1,
            proof: "invoice.pdf".into(),
            description: "Duplicate billing".into(),
            severity: Severity::High,
            person_id: 1,
            company_id: 1,
            category_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
        }],
    }
}

pub async fn context_with(seed: SeedData, slot: Arc<dyn SessionSlot>) -> ConsoleContext {
    ConsoleContext::init(&StaticSeed(seed), slot, &Config::default())
        .await
        .expect("context should initialize")
}

pub async fn context() -> ConsoleContext {
    context_with(seed(), Arc::new(MemorySessionSlot::new())).await
}

pub async fn logged_in_as(username: &str, password: &str) -> ConsoleContext {
    let mut ctx = context().await;
    ctx.login(username, password).await.expect("login should succeed");
    ctx
}
