use std::fs;

use fadeline::persist::{
    read_table, verify_table, write_table, Record, TableWriter, HEADER_BYTES, RECORD_BYTES,
};

// The deterministic fixture shared with the format's other consumers.
fn synthetic_records(n: u64) -> Vec<Record> {
    (0..n)
        .map(|i| Record {
            code: (i + 1).wrapping_mul(1_000_000_007),
            dp0: (i % 3) as i8 - 1,
            dp1: ((i + 1) % 3) as i8 - 1,
            depth0: (i % 1000) as u16,
            depth1: ((3 * i) % 1000) as u16,
        })
        .collect()
}

#[test]
fn thousand_record_round_trip_is_byte_exact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path_a = dir.path().join("a.data");
    let path_b = dir.path().join("b.data");

    let records = synthetic_records(1000);
    let count = write_table(&path_a, &records).expect("write");
    assert_eq!(count, 1000);
    assert_eq!(
        fs::metadata(&path_a).expect("stat").len(),
        (HEADER_BYTES + 1000 * RECORD_BYTES) as u64
    );

    let back = read_table(&path_a).expect("read");
    assert_eq!(back, records);

    // write(read(f)) reproduces f byte for byte
    write_table(&path_b, &back).expect("rewrite");
    let bytes_a = fs::read(&path_a).expect("bytes a");
    let bytes_b = fs::read(&path_b).expect("bytes b");
    assert_eq!(bytes_a, bytes_b);

    let check = verify_table(&path_a).expect("verify");
    assert_eq!(check.record_count, 1000);
    assert_eq!(check.min_code, Some(1_000_000_007));
}

#[test]
fn record_byte_layout_is_little_endian_and_14_wide() {
    let rec = Record {
        code: 0x0102_0304_0506_0708,
        dp0: -1,
        dp1: 1,
        depth0: 0x1234,
        depth1: 0xFFFF,
    };
    let raw = rec.to_bytes();
    assert_eq!(raw.len(), RECORD_BYTES);
    assert_eq!(&raw[0..8], &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
    assert_eq!(raw[8], 0xFF); // -1 as two's complement
    assert_eq!(raw[9], 0x01);
    assert_eq!(&raw[10..12], &[0x34, 0x12]);
    assert_eq!(&raw[12..14], &[0xFF, 0xFF]);
    assert_eq!(Record::from_bytes(&raw), rec);
}

#[test]
fn writer_rejects_out_of_order_pushes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("unsorted.data");
    let mut writer = TableWriter::create(&path).expect("create");
    let mut rec = Record {
        code: 50,
        dp0: 0,
        dp1: 0,
        depth0: 0,
        depth1: 0,
    };
    writer.push(&rec).expect("first push");
    let err = writer.push(&rec).expect_err("duplicate code must fail");
    assert!(err.contains("out of order"), "got: {err}");
    rec.code = 10;
    assert!(writer.push(&rec).is_err());
}

#[test]
fn truncated_table_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("trunc.data");
    write_table(&path, &synthetic_records(16)).expect("write");

    let full = fs::metadata(&path).expect("stat").len();
    let file = fs::OpenOptions::new()
        .write(true)
        .open(&path)
        .expect("reopen");
    file.set_len(full - 3).expect("truncate");

    assert!(read_table(&path).is_err());
    let err = verify_table(&path).expect_err("verify must fail");
    assert!(err.contains("size mismatch"), "got: {err}");
}

#[test]
fn verify_rejects_labels_outside_the_domain() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("badlabel.data");

    // hand-framed file: one record whose dp0 byte is 5
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1u64.to_le_bytes());
    let mut rec = Record {
        code: 42,
        dp0: 0,
        dp1: 0,
        depth0: 7,
        depth1: 7,
    }
    .to_bytes();
    rec[8] = 5;
    bytes.extend_from_slice(&rec);
    fs::write(&path, &bytes).expect("write raw");

    let err = verify_table(&path).expect_err("verify must fail");
    assert!(err.contains("label out of domain"), "got: {err}");
}
