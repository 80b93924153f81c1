// End-to-end signal scenarios, including the interplay with sequences.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use sequin::{LocalHost, Sequence, Signal};

#[test]
fn full_lifecycle_transcript() {
    // The canonical mixed scenario: priorities, once, a call limit, and a
    // removal, across two emissions and a clear.
    let signal: Signal<(i32, String)> = Signal::new();
    let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    let record = |tag: &'static str| {
        let log = Rc::clone(&log);
        let cb: Rc<dyn Fn(i32, String)> =
            Rc::new(move |i, s| log.borrow_mut().push(format!("{tag}:{i}:{s}")));
        cb
    };

    let normal = record("N");
    let once = record("O");
    let limited = record("L");
    let to_remove = record("FAIL");

    signal.add(normal.clone()).with_priority(1);
    signal.add(once.clone()).once();
    signal.add(limited.clone()).call_limit(2);
    signal.add(to_remove.clone());
    signal.remove(&to_remove);

    signal.emit(1, "a".to_string());
    signal.emit(2, "b".to_string());
    signal.clear();
    signal.emit(3, "c".to_string());

    assert_eq!(
        *log.borrow(),
        vec!["N:1:a", "O:1:a", "L:1:a", "N:2:b", "L:2:b"]
    );
    assert_eq!(signal.len(), 0);
}

#[test]
fn add_once_and_add_limited_sugar() {
    let signal: Signal<()> = Signal::new();
    let hits = Rc::new(Cell::new(0u32));

    let cb: Rc<dyn Fn()> = {
        let hits = Rc::clone(&hits);
        Rc::new(move || hits.set(hits.get() + 1))
    };
    signal.add_once(cb.clone());
    for _ in 0..3 {
        signal.emit();
    }
    assert_eq!(hits.get(), 1);

    signal.add_limited(cb, 2);
    for _ in 0..3 {
        signal.emit();
    }
    assert_eq!(hits.get(), 3);
}

#[test]
fn three_argument_emission() {
    let signal: Signal<(String, u32, bool)> = Signal::new();
    let seen = Rc::new(RefCell::new(None));

    let cb: Rc<dyn Fn(String, u32, bool)> = {
        let seen = Rc::clone(&seen);
        Rc::new(move |name, level, alive| {
            *seen.borrow_mut() = Some((name, level, alive));
        })
    };
    signal.add(cb);
    signal.emit("grom".to_string(), 12, true);

    assert_eq!(*seen.borrow(), Some(("grom".to_string(), 12, true)));
}

#[tokio::test]
async fn two_sequences_resume_from_one_emission() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let host = Rc::new(LocalHost::new());
            let signal: Signal<()> = Signal::new();
            let resumed = Rc::new(Cell::new(0u32));

            let seqs: Vec<Sequence> = (0..2)
                .map(|_| {
                    let seq = Sequence::new(Rc::clone(&host) as Rc<dyn sequin::SequenceHost>);
                    let resumed = Rc::clone(&resumed);
                    seq.wait_for_signal(&signal)
                        .then(move || resumed.set(resumed.get() + 1));
                    seq
                })
                .collect();
            for seq in &seqs {
                seq.start();
            }

            tokio::time::sleep(Duration::from_millis(10)).await;
            assert_eq!(signal.len(), 2);

            signal.emit();
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(resumed.get(), 2);
            assert_eq!(signal.len(), 0);
        })
        .await;
}

#[tokio::test]
async fn clearing_the_signal_leaves_the_step_suspended() {
    // Clearing drops the step's listener, so the wait can no longer resolve.
    // Documented hazard of clear(); the sequence just stays suspended.
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let host = Rc::new(LocalHost::new());
            let signal: Signal<()> = Signal::new();

            let seq = Sequence::new(host);
            seq.wait_for_signal(&signal).then(|| {});
            seq.start();

            tokio::time::sleep(Duration::from_millis(10)).await;
            signal.clear();
            signal.emit();

            tokio::time::sleep(Duration::from_millis(20)).await;
            assert!(seq.is_running(), "no listener left to resume the step");
        })
        .await;
}
