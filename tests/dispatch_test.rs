use dispatch_utils::{DispatchConfig, DispatchRuntime, Dispatcher};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(5);

fn start() -> DispatchRuntime {
    DispatchRuntime::start(&DispatchConfig::default()).unwrap()
}

#[test]
fn test_on_main_from_main_runs_inline() {
    let runtime = start();
    let dispatcher = runtime.dispatcher();

    let inner = dispatcher.clone();
    let ran_before_return = dispatcher.on_main_sync(move || {
        let flag = Arc::new(AtomicBool::new(false));
        let set = Arc::clone(&flag);
        inner.on_main(move || set.store(true, Ordering::SeqCst));
        flag.load(Ordering::SeqCst)
    });

    assert!(ran_before_return);
}

#[test]
fn test_on_main_from_background_runs_on_main() {
    let runtime = start();
    let dispatcher = runtime.dispatcher();

    let (tx, rx) = mpsc::channel();
    let inner = dispatcher.clone();
    dispatcher.in_background(move || {
        let on_main = inner.clone();
        let from_background = !inner.is_main();
        inner.on_main(move || {
            tx.send((from_background, on_main.is_main())).unwrap();
        });
    });

    let (from_background, ran_on_main) = rx.recv_timeout(TIMEOUT).unwrap();
    assert!(from_background);
    assert!(ran_on_main);
}

#[test]
fn test_on_main_async_never_inlines() {
    let runtime = start();
    let dispatcher = runtime.dispatcher();

    let flag = Arc::new(AtomicBool::new(false));
    let inner = dispatcher.clone();
    let set = Arc::clone(&flag);
    let ran_inline = dispatcher.on_main_sync(move || {
        let set_later = Arc::clone(&set);
        inner.on_main_async(move || set_later.store(true, Ordering::SeqCst));
        set.load(Ordering::SeqCst)
    });
    assert!(!ran_inline);

    // 之後送入的 sync block 必定排在 async block 之後
    dispatcher.on_main_sync(|| ());
    assert!(flag.load(Ordering::SeqCst));
}

#[test]
fn test_on_main_async_preserves_fifo_order() {
    let runtime = start();
    let dispatcher = runtime.dispatcher();

    let order = Arc::new(Mutex::new(Vec::new()));
    for i in 0..200 {
        let order = Arc::clone(&order);
        dispatcher.on_main_async(move || order.lock().unwrap().push(i));
    }
    dispatcher.on_main_sync(|| ());

    assert_eq!(*order.lock().unwrap(), (0..200).collect::<Vec<_>>());
}

#[test]
fn test_on_main_sync_write_is_visible_after_return() {
    let runtime = start();
    let dispatcher = runtime.dispatcher();

    let value = Arc::new(AtomicUsize::new(0));
    let writer = Arc::clone(&value);
    dispatcher.on_main_sync(move || {
        std::thread::sleep(Duration::from_millis(20));
        writer.store(7, Ordering::SeqCst);
    });

    assert_eq!(value.load(Ordering::SeqCst), 7);
}

#[test]
fn test_on_main_sync_from_main_panics() {
    let runtime = start();
    let dispatcher = runtime.dispatcher();

    let inner = dispatcher.clone();
    let panicked = dispatcher.on_main_sync(move || {
        panic::catch_unwind(AssertUnwindSafe(|| inner.on_main_sync(|| ()))).is_err()
    });

    assert!(panicked);
}

#[test]
fn test_on_main_sync_resumes_block_panic_on_caller() {
    let runtime = start();
    let dispatcher = runtime.dispatcher();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        dispatcher.on_main_sync(|| panic!("boom"));
    }));
    assert!(result.is_err());

    // main context 仍然可用
    assert_eq!(dispatcher.on_main_sync(|| 5), 5);
}

#[test]
fn test_main_context_keeps_running_after_block_panics() {
    let runtime = start();
    let dispatcher = runtime.dispatcher();

    dispatcher.on_main_async(|| panic!("fire-and-forget failure"));
    dispatcher.on_main_after(0.0, || panic!("delayed failure"));
    std::thread::sleep(Duration::from_millis(100));

    let (tx, rx) = mpsc::channel();
    dispatcher.on_main_async(move || tx.send(()).unwrap());
    rx.recv_timeout(TIMEOUT).unwrap();

    assert_eq!(dispatcher.on_main_sync(|| 1), 1);
    assert!(!dispatcher.main().is_closed());
}

#[test]
fn test_on_main_sync_from_background() {
    let runtime = start();
    let dispatcher = runtime.dispatcher();

    let (tx, rx) = mpsc::channel();
    let inner = dispatcher.clone();
    dispatcher.in_background(move || {
        let watcher = inner.clone();
        let ran_on_main = inner.on_main_sync(move || watcher.is_main());
        tx.send(ran_on_main).unwrap();
    });

    assert!(rx.recv_timeout(TIMEOUT).unwrap());
}

#[test]
fn test_in_background_runs_off_main() {
    let runtime = start();
    let dispatcher = runtime.dispatcher();

    let (tx, rx) = mpsc::channel();
    for _ in 0..10 {
        let tx = tx.clone();
        let watcher = dispatcher.clone();
        dispatcher.in_background(move || tx.send(watcher.is_main()).unwrap());
    }

    for _ in 0..10 {
        assert!(!rx.recv_timeout(TIMEOUT).unwrap());
    }
}

#[test]
fn test_on_main_after_waits_then_runs_on_main() {
    let runtime = start();
    let dispatcher = runtime.dispatcher();

    let (tx, rx) = mpsc::channel();
    let watcher = dispatcher.clone();
    let start = Instant::now();
    dispatcher.on_main_after(0.05, move || {
        tx.send((Instant::now(), watcher.is_main())).unwrap();
    });

    let (ran_at, on_main) = rx.recv_timeout(TIMEOUT).unwrap();
    assert!(ran_at.duration_since(start) >= Duration::from_millis(50));
    assert!(on_main);
}

#[test]
fn test_in_background_after_waits_then_runs_in_background() {
    let runtime = start();
    let dispatcher = runtime.dispatcher();

    let (tx, rx) = mpsc::channel();
    let watcher = dispatcher.clone();
    let start = Instant::now();
    dispatcher.in_background_after(0.05, move || {
        tx.send((Instant::now(), watcher.is_main())).unwrap();
    });

    let (ran_at, on_main) = rx.recv_timeout(TIMEOUT).unwrap();
    assert!(ran_at.duration_since(start) >= Duration::from_millis(50));
    assert!(!on_main);
}

#[test]
fn test_non_positive_delays_run_promptly() {
    let runtime = start();
    let dispatcher = runtime.dispatcher();

    let (tx, rx) = mpsc::channel();
    let tx_bg = tx.clone();
    dispatcher.on_main_after(-1.0, move || tx.send("main").unwrap());
    dispatcher.in_background_after(f64::NAN, move || tx_bg.send("background").unwrap());

    let mut seen = vec![rx.recv_timeout(TIMEOUT).unwrap(), rx.recv_timeout(TIMEOUT).unwrap()];
    seen.sort();
    assert_eq!(seen, vec!["background", "main"]);
}

#[test]
fn test_dispatchers_are_independent() {
    let first = start();
    let second = start();

    let a: Dispatcher = first.dispatcher();
    let b: Dispatcher = second.dispatcher();

    let b_check = b.clone();
    let on_b_main = a.on_main_sync(move || b_check.is_main());
    assert!(!on_b_main);
}

#[test]
fn test_pending_main_work_drains_on_shutdown() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let runtime = start();
        let dispatcher = runtime.dispatcher();
        for _ in 0..50 {
            let counter = Arc::clone(&counter);
            dispatcher.on_main_async(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
    }

    assert_eq!(counter.load(Ordering::SeqCst), 50);
}
