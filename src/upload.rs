//! File drop/select state of an upload control.
//!
//! [`FileDropState`] accepts a file by explicit choice or drag and drop,
//! keeps the drag highlight stable while the pointer crosses child
//! elements, and shows how much of the selected file has been read.
//!
//! Every selection gets a fresh [`ReadTicket`]. Progress reported with an
//! older ticket belongs to a file that has since been replaced or cleared
//! and is discarded.

use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::value::FileRef;

const READ_CHUNK: usize = 64 * 1024;

/// Identifies one file selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadTicket(u64);

/// Notification for the form owning the upload control.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// A new file replaced whatever was selected before.
    Selected(FileRef),
    /// The selection was removed.
    Cleared,
}

/// State of one upload control.
///
/// # Example
///
/// ```rust
/// use inquest::{FileDropState, FileRef, UploadEvent};
///
/// let mut upload = FileDropState::new();
///
/// upload.drag_enter();
/// upload.drag_enter(); // pointer moved onto a child element
/// upload.drag_leave();
/// assert!(upload.is_dragging());
///
/// let (event, ticket) = upload
///     .drop_files([FileRef::new("cv.pdf", "application/pdf", 2048)])
///     .unwrap();
/// assert!(matches!(event, UploadEvent::Selected(_)));
/// assert!(!upload.is_dragging());
///
/// upload.report_progress(ticket, 1024, 2048);
/// assert_eq!(upload.progress(), 50);
/// ```
#[derive(Debug, Default)]
pub struct FileDropState {
    drag_depth: u32,
    file: Option<FileRef>,
    progress: u8,
    generation: u64,
}

impl FileDropState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pointer carrying a drag entered the control or one of its children.
    pub fn drag_enter(&mut self) {
        self.drag_depth = self.drag_depth.saturating_add(1);
    }

    /// The pointer carrying a drag left the control or one of its children.
    pub fn drag_leave(&mut self) {
        self.drag_depth = self.drag_depth.saturating_sub(1);
    }

    /// True while a drag is over the control.
    pub fn is_dragging(&self) -> bool {
        self.drag_depth > 0
    }

    pub fn drag_depth(&self) -> u32 {
        self.drag_depth
    }

    /// Handles files dropped on the control. Ends the drag and selects the
    /// first file. Returns None, leaving the selection untouched, if no file
    /// was dropped.
    pub fn drop_files<I>(&mut self, files: I) -> Option<(UploadEvent, ReadTicket)>
    where
        I: IntoIterator<Item = FileRef>,
    {
        self.drag_depth = 0;
        self.choose(files)
    }

    /// Handles files picked through a file dialog. Selects the first file.
    /// Returns None, leaving the selection untouched, if nothing was picked.
    pub fn choose<I>(&mut self, files: I) -> Option<(UploadEvent, ReadTicket)>
    where
        I: IntoIterator<Item = FileRef>,
    {
        let file = files.into_iter().next()?;
        tracing::debug!(name = %file.name, size = file.size, "file selected");

        let ticket = self.next_ticket();
        self.file = Some(file.clone());
        self.progress = 0;
        Some((UploadEvent::Selected(file), ticket))
    }

    /// Removes the selected file and resets progress.
    pub fn clear(&mut self) -> UploadEvent {
        self.next_ticket();
        self.file = None;
        self.progress = 0;
        UploadEvent::Cleared
    }

    /// Records that `loaded` of `total` bytes have been read.
    ///
    /// Returns false, changing nothing, if the ticket is stale.
    pub fn report_progress(&mut self, ticket: ReadTicket, loaded: u64, total: u64) -> bool {
        if !self.is_current(ticket) {
            tracing::trace!(?ticket, "discarding stale read progress");
            return false;
        }
        self.progress = percent(loaded, total);
        true
    }

    /// Records that the read finished. Returns false if the ticket is stale.
    pub fn complete(&mut self, ticket: ReadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.progress = 100;
        true
    }

    pub fn file(&self) -> Option<&FileRef> {
        self.file.as_ref()
    }

    /// Read progress of the selected file, 0 to 100.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// True if `ticket` belongs to the current selection.
    pub fn is_current(&self, ticket: ReadTicket) -> bool {
        self.file.is_some() && ticket.0 == self.generation
    }

    fn next_ticket(&mut self) -> ReadTicket {
        self.generation += 1;
        ReadTicket(self.generation)
    }
}

fn percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (u128::from(loaded) * 100 + u128::from(total) / 2) / u128::from(total);
    pct.min(100) as u8
}

/// Reads `reader` to the end, reporting progress to `state` after each chunk.
///
/// The read always runs to completion. If the selection changes meanwhile,
/// the remaining progress updates are discarded by the ticket check. The
/// lock on `state` is only held while recording progress.
pub async fn read_with_progress<R>(
    state: &Mutex<FileDropState>,
    ticket: ReadTicket,
    mut reader: R,
    total: u64,
) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let capacity = usize::try_from(total).unwrap_or(usize::MAX).min(READ_CHUNK * 16);
    let mut bytes = Vec::with_capacity(capacity);
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        state
            .lock()
            .report_progress(ticket, bytes.len() as u64, total);
    }

    state.lock().complete(ticket);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> FileRef {
        FileRef::new(name, "application/pdf", 1000)
    }

    #[test]
    fn test_drag_depth_never_negative() {
        let mut state = FileDropState::new();
        state.drag_leave();
        state.drag_leave();
        assert_eq!(state.drag_depth(), 0);
        state.drag_enter();
        assert!(state.is_dragging());
    }

    #[test]
    fn test_nested_enter_leave_keeps_dragging() {
        let mut state = FileDropState::new();
        state.drag_enter();
        state.drag_enter();
        state.drag_leave();
        assert!(state.is_dragging());
        state.drag_leave();
        assert!(!state.is_dragging());
    }

    #[test]
    fn test_only_first_file_is_taken() {
        let mut state = FileDropState::new();
        let (event, _) = state.choose([pdf("a.pdf"), pdf("b.pdf")]).unwrap();
        assert_eq!(event, UploadEvent::Selected(pdf("a.pdf")));
        assert_eq!(state.file(), Some(&pdf("a.pdf")));
    }

    #[test]
    fn test_empty_drop_keeps_selection_but_ends_drag() {
        let mut state = FileDropState::new();
        state.choose([pdf("a.pdf")]);
        state.drag_enter();

        assert!(state.drop_files(Vec::new()).is_none());
        assert!(!state.is_dragging());
        assert_eq!(state.file(), Some(&pdf("a.pdf")));
    }

    #[test]
    fn test_new_selection_invalidates_old_ticket() {
        let mut state = FileDropState::new();
        let (_, first) = state.choose([pdf("a.pdf")]).unwrap();
        let (_, second) = state.choose([pdf("b.pdf")]).unwrap();

        assert!(state.report_progress(second, 10, 100));
        assert!(!state.report_progress(first, 100, 100));
        assert!(!state.complete(first));
        assert_eq!(state.progress(), 10);
    }

    #[test]
    fn test_clear_resets_and_invalidates() {
        let mut state = FileDropState::new();
        let (_, ticket) = state.choose([pdf("a.pdf")]).unwrap();
        state.report_progress(ticket, 50, 100);

        assert_eq!(state.clear(), UploadEvent::Cleared);
        assert_eq!(state.progress(), 0);
        assert!(state.file().is_none());
        assert!(!state.complete(ticket));
        assert_eq!(state.progress(), 0);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0, 3), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(5, 3), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[tokio::test]
    async fn test_read_with_progress_reaches_100() {
        let state = Mutex::new(FileDropState::new());
        let data = vec![7u8; READ_CHUNK * 2 + 10];
        let ticket = {
            let mut guard = state.lock();
            let (_, ticket) = guard
                .choose([FileRef::new("big.png", "image/png", data.len() as u64)])
                .unwrap();
            ticket
        };

        let bytes = read_with_progress(&state, ticket, data.as_slice(), data.len() as u64)
            .await
            .unwrap();

        assert_eq!(bytes.len(), data.len());
        assert_eq!(state.lock().progress(), 100);
    }

    #[tokio::test]
    async fn test_read_for_replaced_file_does_not_touch_progress() {
        let state = Mutex::new(FileDropState::new());
        let (_, old) = state.lock().choose([pdf("old.pdf")]).unwrap();
        let (_, new) = state.lock().choose([pdf("new.pdf")]).unwrap();
        state.lock().report_progress(new, 20, 100);

        let data = vec![1u8; 100];
        let bytes = read_with_progress(&state, old, data.as_slice(), 100)
            .await
            .unwrap();

        assert_eq!(bytes.len(), 100);
        assert_eq!(state.lock().progress(), 20);
    }
}
