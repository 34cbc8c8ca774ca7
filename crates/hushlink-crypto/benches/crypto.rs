use hushlink_crypto::{codec, decrypt, encrypt, generate_key, Envelope};

fn make_text(size: usize) -> String {
    (0..size)
        .map(|i| char::from(b'a' + (i.wrapping_mul(7) % 26) as u8))
        .collect()
}

#[divan::bench(args = [64, 4096, 65536])]
fn bench_encrypt(bencher: divan::Bencher, size: usize) {
    let key = generate_key();
    let text = make_text(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| encrypt(divan::black_box(&key), divan::black_box(&text)).unwrap());
}

#[divan::bench(args = [64, 4096, 65536])]
fn bench_decrypt(bencher: divan::Bencher, size: usize) {
    let key = generate_key();
    let raw = key.to_bytes();
    let envelope = encrypt(&key, &make_text(size)).unwrap();
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| decrypt(divan::black_box(&raw), divan::black_box(&envelope)).unwrap());
}

#[divan::bench(args = [64, 4096, 65536])]
fn bench_envelope_text_roundtrip(bencher: divan::Bencher, size: usize) {
    let key = generate_key();
    let text = encrypt(&key, &make_text(size)).unwrap().to_base64url();
    bencher
        .counter(divan::counter::BytesCount::new(text.len()))
        .bench(|| {
            let env = Envelope::from_base64url(divan::black_box(&text)).unwrap();
            codec::encode(&env.pack())
        });
}

fn main() {
    divan::main();
}
