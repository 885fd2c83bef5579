use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use models::{TokenGrant, UserProfile};
use service::session::{ManualClock, SessionStore, StorageKeys};
use service::storage::MemoryStore;
use service::validation::{format_phone, password_strength, RegistrationForm};

fn bench_registration_form(c: &mut Criterion) {
    let form = RegistrationForm {
        first_name: "Bench".into(),
        last_name: "Mark".into(),
        email: "bench.mark@example.com.br".into(),
        phone: "(11) 99999-8888".into(),
        password: "Benchmark1!".into(),
        password_confirmation: "Benchmark1!".into(),
        accept_terms: true,
    };

    c.bench_function("registration_form_validate", |b| {
        b.iter(|| black_box(&form).validate())
    });
    c.bench_function("password_strength", |b| b.iter(|| password_strength(black_box("Benchmark1!"))));
    c.bench_function("format_phone", |b| b.iter(|| format_phone(black_box("11999998888"))));
}

fn bench_establish(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = rt
        .block_on(SessionStore::load(
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::starting_at(1_709_251_200_000)),
            StorageKeys::default(),
        ))
        .unwrap();
    let grant = TokenGrant {
        access_token: "bench-token".into(),
        token_type: "bearer".into(),
        expires_in: 3600,
        user: UserProfile {
            id: "bench".into(),
            email: "bench@example.com".into(),
            first_name: "Bench".into(),
            last_name: "Mark".into(),
            phone: None,
            active: true,
            created_at: "2024-01-01T00:00:00".into(),
            updated_at: "2024-01-01T00:00:00".into(),
        },
    };

    c.bench_function("session_establish_memory", |b| {
        b.to_async(&rt).iter(|| async { store.establish(&grant).await.unwrap() })
    });
}

criterion_group!(benches, bench_registration_form, bench_establish);
criterion_main!(benches);
