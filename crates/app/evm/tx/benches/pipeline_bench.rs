//! Benchmarks for the signing pipeline and native message conversion.

#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evolve_evm_params::ChainConfig;
use evolve_evm_tx::{
    tx_type, InMemoryKeyring, MessageConverter, SigningScheme, TxBuilder, TxVariant,
};

const CHAIN_ID: u64 = 9000;

fn variant_name(ty: u8) -> &'static str {
    match ty {
        tx_type::LEGACY => "legacy",
        tx_type::EIP2930 => "access_list",
        _ => "dynamic_fee",
    }
}

fn bench_signed_tx(c: &mut Criterion) {
    let mut keyring = InMemoryKeyring::new();
    let from = keyring.generate();
    let builder = TxBuilder::new(CHAIN_ID);
    let scheme = SigningScheme::latest(CHAIN_ID);

    let mut group = c.benchmark_group("signed_tx");
    for ty in [tx_type::LEGACY, tx_type::EIP2930, tx_type::EIP1559] {
        group.bench_with_input(BenchmarkId::from_parameter(variant_name(ty)), &ty, |b, &ty| {
            let mut nonce = 0u64;
            b.iter(|| {
                let variant = TxVariant::template(ty, 0).unwrap();
                let tx = builder
                    .build_signed(variant, nonce, &keyring, from, &scheme)
                    .unwrap();
                nonce = nonce.wrapping_add(1);
                black_box(tx)
            })
        });
    }
    group.finish();
}

fn bench_native_message(c: &mut Criterion) {
    let mut keyring = InMemoryKeyring::new();
    let from = keyring.generate();
    let config = ChainConfig::default();
    let converter = MessageConverter::new(&config, CHAIN_ID);
    let builder = TxBuilder::new(CHAIN_ID);
    let scheme = SigningScheme::latest(CHAIN_ID);

    let mut group = c.benchmark_group("native_message");
    for ty in [tx_type::LEGACY, tx_type::EIP2930, tx_type::EIP1559] {
        let tx = builder
            .build_signed(TxVariant::template(ty, 0).unwrap(), 1, &keyring, from, &scheme)
            .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(variant_name(ty)), &tx, |b, tx| {
            b.iter(|| black_box(converter.to_message(tx, 1, Some(3), None).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_signed_tx, bench_native_message);
criterion_main!(benches);
