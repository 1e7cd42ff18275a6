use criterion::{criterion_group, criterion_main, Criterion};
use monocrack::{Alphabet, CipherMachine, FitnessModel, QuadgramModel};
use std::hint::black_box;

fn setup() -> (CipherMachine, QuadgramModel, Vec<u8>, Vec<u8>) {
    let alphabet = Alphabet::english();
    let machine = CipherMachine::new(alphabet.clone());

    // Synthetic quadgram table covering a spread of grams.
    let mut counts = Vec::new();
    for a in ["TH", "HE", "IN", "ER", "AN", "RE", "ON"] {
        for b in ["AT", "EN", "ND", "TI", "ES", "OR"] {
            counts.push((format!("{}{}", a, b), 1000u64));
        }
    }
    let model =
        QuadgramModel::from_counts(&alphabet, counts.iter().map(|(g, c)| (g.as_str(), *c)))
            .unwrap();

    let mut rng = fastrand::Rng::with_seed(42);
    let text: Vec<u8> = (0..1000).map(|_| rng.u8(0..26)).collect();
    let mut key: Vec<u8> = (0..26).collect();
    rng.shuffle(&mut key);

    (machine, model, text, key)
}

fn bench_decode_and_score(c: &mut Criterion) {
    let (machine, model, text, key) = setup();
    let mut decoded = vec![0u8; text.len()];
    let mut subkey = vec![0u8; 26];

    c.bench_function("decode_1k", |b| {
        b.iter(|| {
            machine.decode_into(
                black_box(&mut decoded),
                black_box(&mut subkey),
                black_box(&text),
                black_box(&key),
            );
        })
    });

    c.bench_function("score_1k", |b| {
        machine.decode_into(&mut decoded, &mut subkey, &text, &key);
        b.iter(|| black_box(model.score(black_box(&decoded))))
    });

    c.bench_function("decode_and_score_1k", |b| {
        b.iter(|| {
            machine.decode_into(&mut decoded, &mut subkey, &text, &key);
            black_box(model.score(&decoded))
        })
    });
}

criterion_group!(benches, bench_decode_and_score);
criterion_main!(benches);
