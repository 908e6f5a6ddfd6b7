use std::sync::Arc;

use inquest::{read_with_progress, FileDropState, FileRef, UploadEvent};
use parking_lot::Mutex;
use tokio::io::AsyncWriteExt;

fn png(name: &str, size: u64) -> FileRef {
    FileRef::new(name, "image/png", size)
}

#[test]
fn test_drag_counter_matches_enters_minus_leaves() {
    // Deterministic pseudo-random enter/leave sequences.
    let mut seed: u32 = 0x2545_f491;
    for _ in 0..50 {
        let mut state = FileDropState::new();
        let mut depth: i64 = 0;

        for _ in 0..40 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;

            if seed % 3 == 0 {
                state.drag_leave();
                depth = (depth - 1).max(0);
            } else {
                state.drag_enter();
                depth += 1;
            }
            assert_eq!(state.is_dragging(), depth > 0);
            assert_eq!(i64::from(state.drag_depth()), depth);
        }
    }
}

#[test]
fn test_drop_then_clear() {
    let mut state = FileDropState::new();
    state.drag_enter();

    let (event, ticket) = state.drop_files([png("photo.png", 10)]).unwrap();
    assert_eq!(event, UploadEvent::Selected(png("photo.png", 10)));
    assert!(!state.is_dragging());
    assert!(state.is_current(ticket));

    assert_eq!(state.clear(), UploadEvent::Cleared);
    assert!(!state.is_current(ticket));
    assert!(state.file().is_none());
}

#[test]
fn test_short_name_for_display() {
    let file = png("holiday-photos-2024.png", 1);
    assert_eq!(file.short_name(), "holiday-p...png");
}

#[tokio::test]
async fn test_replacing_file_mid_read() {
    let state = Arc::new(Mutex::new(FileDropState::new()));
    let (_, first) = state.lock().choose([png("a.png", 200_000)]).unwrap();

    let (mut source, sink) = tokio::io::duplex(256 * 1024);
    let reader = {
        let state = Arc::clone(&state);
        tokio::spawn(async move { read_with_progress(&state, first, sink, 200_000).await })
    };

    // First half arrives while a.png is still selected.
    source.write_all(&vec![0u8; 100_000]).await.unwrap();
    while state.lock().progress() < 50 {
        tokio::task::yield_now().await;
    }

    let (_, second) = state.lock().choose([png("b.png", 10)]).unwrap();
    assert_eq!(state.lock().progress(), 0);

    source.write_all(&vec![0u8; 100_000]).await.unwrap();
    drop(source);
    let bytes = reader.await.unwrap().unwrap();
    assert_eq!(bytes.len(), 200_000);

    let state = state.lock();
    assert_eq!(state.file().map(|f| f.name.as_str()), Some("b.png"));
    assert!(state.is_current(second));
    assert_eq!(state.progress(), 0);
}
