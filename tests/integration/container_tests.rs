//! Container-level integration tests.
//!
//! Tests verify:
//! - Magic validation accepts exactly one 8-byte sequence
//! - The directory chain scan respects the header-region bound
//! - Levels are exposed in the reverse of their on-disk order
//! - Containers with zero levels open cleanly

use zif_reader::{ZifError, ZifReader, ZIF_MAGIC};

use super::test_utils::{build_zif, write_tag_record, LevelSpec};

fn single_level() -> Vec<u8> {
    build_zif(&[LevelSpec::new(
        256,
        256,
        256,
        256,
        vec![b"payload".to_vec()],
    )])
}

// =============================================================================
// Magic validation
// =============================================================================

#[test]
fn test_open_valid_container() {
    let reader = ZifReader::from_vec(single_level()).unwrap();
    assert_eq!(reader.level_count(), 1);
}

#[test]
fn test_any_magic_mutation_is_rejected() {
    for i in 0..8 {
        let mut data = single_level();
        data[i] ^= 0xFF;

        let err = ZifReader::from_vec(data).unwrap_err();
        assert!(
            matches!(err, ZifError::InvalidMagic(_)),
            "mutating magic byte {i} should fail open, got {err:?}"
        );
    }
}

#[test]
fn test_empty_container_is_valid() {
    let reader = ZifReader::from_vec(build_zif(&[])).unwrap();
    assert_eq!(reader.level_count(), 0);
}

#[test]
fn test_truncated_header_fails_atomically() {
    // Magic alone, with no terminator or directory offset after it.
    let data = ZIF_MAGIC.to_le_bytes().to_vec();
    let err = ZifReader::from_vec(data).unwrap_err();
    assert!(matches!(err, ZifError::Io(_)));
}

// =============================================================================
// Level ordering
// =============================================================================

#[test]
fn test_levels_exposed_in_reverse_of_disk_order() {
    let data = build_zif(&[
        LevelSpec::new(512, 256, 256, 256, vec![vec![1], vec![2]]),
        LevelSpec::new(256, 256, 256, 256, vec![vec![3]]),
        LevelSpec::new(128, 128, 256, 256, vec![vec![4]]),
    ]);

    let reader = ZifReader::from_vec(data).unwrap();
    assert_eq!(reader.level_count(), 3);

    let widths: Vec<u64> = reader
        .levels()
        .iter()
        .map(|level| level.width().unwrap())
        .collect();
    assert_eq!(widths, vec![128, 256, 512]);
}

// =============================================================================
// Header-region bound
// =============================================================================

#[test]
fn test_scan_stops_once_cursor_leaves_header_region() {
    // Three chained directories: the first inside the header region, the
    // second beyond it. The second is still parsed (its offset was read
    // while the cursor was inside the region), but the cursor then rests
    // past the bound, so the third is never visited.
    let mut data = ZIF_MAGIC.to_le_bytes().to_vec();
    data.extend_from_slice(&16u64.to_le_bytes());

    // Directory 1 at 16
    data.extend_from_slice(&1u64.to_le_bytes());
    write_tag_record(&mut data, 0x0100, 1, 100);
    data.extend_from_slice(&8200u64.to_le_bytes());

    data.resize(8200, 0);

    // Directory 2 at 8200
    data.extend_from_slice(&1u64.to_le_bytes());
    write_tag_record(&mut data, 0x0100, 1, 200);
    data.extend_from_slice(&8236u64.to_le_bytes());

    // Directory 3 at 8236, valid but unreachable
    data.extend_from_slice(&1u64.to_le_bytes());
    write_tag_record(&mut data, 0x0100, 1, 300);
    data.extend_from_slice(&0u64.to_le_bytes());

    let reader = ZifReader::from_vec(data).unwrap();
    assert_eq!(reader.level_count(), 2);

    // Reversed exposure: directory 2 first, directory 1 last.
    assert_eq!(reader.levels()[0].width().unwrap(), 200);
    assert_eq!(reader.levels()[1].width().unwrap(), 100);
}

// =============================================================================
// Opening from a file
// =============================================================================

#[test]
fn test_open_from_path() {
    let path = std::env::temp_dir().join(format!("zif-reader-test-{}.zif", std::process::id()));
    std::fs::write(&path, single_level()).unwrap();

    let mut reader = ZifReader::open_path(&path).unwrap();
    assert_eq!(reader.level_count(), 1);
    assert_eq!(&reader.read_tile(0, 0, 0).unwrap()[..], b"payload");

    drop(reader);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_level_index_out_of_range() {
    let mut reader = ZifReader::from_vec(single_level()).unwrap();
    let err = reader.read_tile(3, 0, 0).unwrap_err();
    assert!(matches!(
        err,
        ZifError::LevelOutOfRange { index: 3, count: 1 }
    ));
}
