//! Filters a large synthetic catalog, simulating one keystroke per iteration.

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, Criterion};
use kbmarket::{
    domain::{filter, Query},
    Catalog, Listing, ListingId, Status,
};

/// Repeats the built-in listings under fresh ids.
fn large_catalog(copies: usize) -> Catalog {
    let builtin = Catalog::builtin().unwrap();
    let listings = (0..copies)
        .flat_map(|copy| {
            builtin.listings().iter().map(move |listing| {
                Listing::new(
                    ListingId::new(format!("{copy}-{}", listing.id())).unwrap(),
                    listing.title(),
                    listing.description(),
                    listing.asset(),
                    if copy % 2 == 0 {
                        listing.status()
                    } else {
                        Status::ComingSoon
                    },
                    listing.authority(),
                )
            })
        })
        .collect();
    Catalog::new(listings).unwrap()
}

fn filter_catalog(c: &mut Criterion) {
    let catalog = large_catalog(2_000);

    c.bench_function("filter empty query", |b| {
        b.iter(|| filter(catalog.listings(), ""));
    });

    c.bench_function("filter authority query", |b| {
        b.iter(|| filter(catalog.listings(), "vara"));
    });

    c.bench_function("filter no match", |b| {
        let query = Query::new("zzz");
        b.iter(|| query.apply(&catalog));
    });
}

criterion_group!(benches, filter_catalog);
criterion_main!(benches);
