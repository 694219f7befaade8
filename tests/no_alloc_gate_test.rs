use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tui_patience::core::{BoardSnapshot, BoardState};
use tui_patience::types::GameAction;

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn core_hot_paths_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let mut board = BoardState::new(1);
    let mut snap = BoardSnapshot::default();

    // Warm-up.
    let _ = board.move_cursor(1, 0);
    let _ = board.reveal_next();

    let allocs = with_alloc_counting(|| {
        for i in 0..300 {
            let _ = board.move_cursor(0, 1);
            let _ = board.move_cursor(if i % 3 == 0 { -1 } else { 1 }, 0);
            let _ = board.primary_action();
            let _ = board.primary_action();
            let _ = board.reveal_next();
            let _ = board.apply_action(GameAction::Up);
            let _ = board.check_integrity();
            board.snapshot_into(&mut snap);
        }
    });

    assert!(allocs == 0);
}
