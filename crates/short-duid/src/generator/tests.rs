use crate::{
    BasicDuidGenerator, DuidConfig, DuidGenerator, DuidId, Error, LockDuidGenerator,
    SHORT_DUID_EPOCH, TICK_CAPACITY, TimeSource, WallClock, unix_millis,
};
use rand::Rng;
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread::scope;

const SALT: &str = "39622feb2b3e7aa7208f50f45ec36fd513baadad6977b53295a3b28aeaed4a54";

struct MockTime {
    millis: i64,
}

impl TimeSource<i64> for MockTime {
    fn current_millis(&self) -> i64 {
        self.millis
    }
}

struct MockStepTime {
    values: Vec<i64>,
    index: Cell<usize>,
}

#[derive(Clone)]
struct SharedMockStepTime {
    clock: Rc<MockStepTime>,
}

impl SharedMockStepTime {
    fn new(values: Vec<i64>) -> Self {
        Self {
            clock: Rc::new(MockStepTime {
                values,
                index: Cell::new(0),
            }),
        }
    }

    fn step(&self, index: usize) {
        self.clock.index.set(index);
    }
}

impl TimeSource<i64> for SharedMockStepTime {
    fn current_millis(&self) -> i64 {
        self.clock.values[self.clock.index.get()]
    }
}

fn assert_strictly_increasing(ids: &[DuidId]) {
    for pair in ids.windows(2) {
        assert!(pair[0] < pair[1], "{:?} !< {:?}", pair[0], pair[1]);
    }
}

fn assert_all_unique<T: Eq + core::hash::Hash>(items: impl IntoIterator<Item = T>) -> usize {
    let mut seen = HashSet::new();
    for item in items {
        assert!(seen.insert(item), "duplicate id");
    }
    seen.len()
}

fn run_adopts_time_then_increments_within_tick<G, T>(generator: &G)
where
    G: DuidGenerator<T>,
    T: TimeSource<i64>,
{
    let id1 = generator.try_next_id().unwrap();
    let id2 = generator.try_next_id().unwrap();
    let id3 = generator.try_next_id().unwrap();

    assert_eq!(id1.timestamp(), 42);
    assert_eq!(id2.timestamp(), 42);
    assert_eq!(id3.timestamp(), 42);
    assert_eq!(id1.sequence(), 0);
    assert_eq!(id2.sequence(), 1);
    assert_eq!(id3.sequence(), 2);
    assert_eq!(id1.shard_id(), u64::from(generator.shard_id()));
    assert!(id1 < id2 && id2 < id3);
}

fn run_force_advances_when_sequence_exhausted<G, T>(generator: &G)
where
    G: DuidGenerator<T>,
    T: TimeSource<i64>,
{
    for i in 0..=DuidId::max_sequence() {
        let id = generator.try_next_id().unwrap();
        assert_eq!(id.sequence(), i);
        assert_eq!(id.timestamp(), 42);
    }

    // The clock is frozen at 42, so virtual time has to move on its own.
    let id = generator.try_next_id().unwrap();
    assert_eq!(id.timestamp(), 43);
    assert_eq!(id.sequence(), 0);

    let id = generator.try_next_id().unwrap();
    assert_eq!(id.timestamp(), 43);
    assert_eq!(id.sequence(), 1);
}

fn run_keeps_virtual_time_when_clock_regresses<G>(generator: &G, time: &SharedMockStepTime)
where
    G: DuidGenerator<SharedMockStepTime>,
{
    let first = generator.try_next_id().unwrap();
    assert_eq!((first.timestamp(), first.sequence()), (100, 0));

    time.step(1);
    let regressed = generator.try_next_id().unwrap();
    assert_eq!((regressed.timestamp(), regressed.sequence()), (100, 1));
    assert!(regressed > first);

    time.step(2);
    let recovered = generator.try_next_id().unwrap();
    assert_eq!((recovered.timestamp(), recovered.sequence()), (101, 0));
    assert!(recovered > regressed);
}

fn run_drift_backwards_stays_monotonic<G>(generator: &G)
where
    G: DuidGenerator<WallClock>,
{
    let id1 = generator.get_duid_int(1).unwrap()[0];

    let drift = -rand::rng().random_range(1..=10_000);
    assert_eq!(generator.drift_time(drift), drift);

    // Enough IDs to roll the sequence over at least once.
    let ids = generator.get_duid_int(4096).unwrap();
    assert_eq!(ids.len(), 4096);
    assert!(ids[4095] > id1);
    assert!(ids.iter().all(|id| *id > id1));
    assert_strictly_increasing(&ids);
    assert!(generator.current_time_ms() < unix_millis());
}

fn run_legacy_batch_lengths<G>(generator: &G)
where
    G: DuidGenerator<WallClock>,
{
    for (asked, expected) in [(1, 1), (0, 0), (8192, 8192), (8193, 1)] {
        assert_eq!(generator.get_duid_int(asked).unwrap().len(), expected);
        assert_eq!(generator.get_duid(asked).unwrap().len(), expected);
    }
}

fn run_generate_spans_ticks<G>(generator: &G)
where
    G: DuidGenerator<WallClock>,
{
    let ids = generator.generate(3 * TICK_CAPACITY + 1).unwrap();
    assert_eq!(ids.len(), 3 * TICK_CAPACITY + 1);
    assert_strictly_increasing(&ids);

    let short = generator.generate_short(TICK_CAPACITY + 1).unwrap();
    assert_eq!(short.len(), TICK_CAPACITY + 1);
    assert_all_unique(short);
}

fn run_oversized_batch_at_last_tick_errors<G, T>(generator: &G)
where
    G: DuidGenerator<T>,
    T: TimeSource<i64>,
{
    let result = generator.generate(usize::MAX);
    assert_eq!(
        result,
        Err(Error::TimestampOverflow {
            timestamp: DuidId::max_timestamp() + 1,
            bits: DuidId::TIMESTAMP_BITS,
        })
    );
}

fn run_threaded_unique(generator: &LockDuidGenerator<WallClock>) {
    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 4 * TICK_CAPACITY;
    const TOTAL_IDS: usize = THREADS * IDS_PER_THREAD;

    let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

    scope(|s| {
        for thread in 0..THREADS {
            let seen_ids = Arc::clone(&seen_ids);
            s.spawn(move || {
                // Mix single issues and batches on the same generator.
                let ids: Vec<DuidId> = if thread % 2 == 0 {
                    (0..IDS_PER_THREAD)
                        .map(|_| generator.try_next_id().unwrap())
                        .collect()
                } else {
                    generator.generate(IDS_PER_THREAD).unwrap()
                };
                let mut seen = seen_ids.lock().unwrap();
                for id in ids {
                    assert!(seen.insert(id));
                }
            });
        }
    });

    let final_count = seen_ids.lock().unwrap().len();
    assert_eq!(final_count, TOTAL_IDS, "Expected {TOTAL_IDS} unique IDs");
}

#[test]
fn basic_generator_sequence_test() {
    let generator = BasicDuidGenerator::new(123, SALT, 0, MockTime { millis: 42 });
    run_adopts_time_then_increments_within_tick(&generator);
}

#[test]
fn lock_generator_sequence_test() {
    let generator = LockDuidGenerator::new(123, SALT, 0, MockTime { millis: 42 });
    run_adopts_time_then_increments_within_tick(&generator);
}

#[test]
fn basic_generator_force_advance_test() {
    let generator = BasicDuidGenerator::new(1, SALT, 0, MockTime { millis: 42 });
    run_force_advances_when_sequence_exhausted(&generator);
}

#[test]
fn lock_generator_force_advance_test() {
    let generator = LockDuidGenerator::new(1, SALT, 0, MockTime { millis: 42 });
    run_force_advances_when_sequence_exhausted(&generator);
}

#[test]
fn basic_generator_regression_test() {
    let time = SharedMockStepTime::new(vec![100, 50, 101]);
    let generator = BasicDuidGenerator::new(9, SALT, 0, time.clone());
    run_keeps_virtual_time_when_clock_regresses(&generator, &time);
}

#[test]
fn lock_generator_regression_test() {
    let time = SharedMockStepTime::new(vec![100, 50, 101]);
    let generator = LockDuidGenerator::new(9, SALT, 0, time.clone());
    run_keeps_virtual_time_when_clock_regresses(&generator, &time);
}

#[test]
fn basic_generator_drift_test() {
    let generator = BasicDuidGenerator::new(123, SALT, SHORT_DUID_EPOCH, WallClock);
    run_drift_backwards_stays_monotonic(&generator);
}

#[test]
fn lock_generator_drift_test() {
    let generator = LockDuidGenerator::new(123, SALT, SHORT_DUID_EPOCH, WallClock);
    run_drift_backwards_stays_monotonic(&generator);
}

#[test]
fn basic_generator_batch_length_test() {
    let generator = BasicDuidGenerator::new(123, SALT, SHORT_DUID_EPOCH, WallClock);
    run_legacy_batch_lengths(&generator);
}

#[test]
fn lock_generator_batch_length_test() {
    let generator = LockDuidGenerator::new(123, SALT, SHORT_DUID_EPOCH, WallClock);
    run_legacy_batch_lengths(&generator);
}

#[test]
fn basic_generator_full_batch_test() {
    let generator = BasicDuidGenerator::new(5, SALT, SHORT_DUID_EPOCH, WallClock);
    run_generate_spans_ticks(&generator);
}

#[test]
fn lock_generator_full_batch_test() {
    let generator = LockDuidGenerator::new(5, SALT, SHORT_DUID_EPOCH, WallClock);
    run_generate_spans_ticks(&generator);
}

#[test]
fn basic_generator_oversized_batch_test() {
    let last_tick = i64::try_from(DuidId::max_timestamp()).unwrap();
    let generator = BasicDuidGenerator::new(0, SALT, 0, MockTime { millis: last_tick });
    run_oversized_batch_at_last_tick_errors(&generator);
}

#[test]
fn lock_generator_oversized_batch_test() {
    let last_tick = i64::try_from(DuidId::max_timestamp()).unwrap();
    let generator = LockDuidGenerator::new(0, SALT, 0, MockTime { millis: last_tick });
    run_oversized_batch_at_last_tick_errors(&generator);
}

#[test]
fn lock_generator_threaded_unique() {
    let generator = LockDuidGenerator::new(0, SALT, SHORT_DUID_EPOCH, WallClock);
    run_threaded_unique(&generator);
}

#[test]
fn accessors_report_normalized_settings() {
    let instance1 = BasicDuidGenerator::new(123, SALT, SHORT_DUID_EPOCH, WallClock);
    let instance2 = LockDuidGenerator::new(12, SALT, SHORT_DUID_EPOCH, WallClock);

    assert_eq!(instance1.epoch_start(), SHORT_DUID_EPOCH);
    assert_eq!(instance2.epoch_start(), SHORT_DUID_EPOCH);
    assert_eq!(instance1.salt(), SALT);
    assert_eq!(instance1.salt(), instance2.salt());
    assert_eq!(instance1.shard_id(), 123);
    assert_eq!(instance2.shard_id(), 12);

    let overflow = BasicDuidGenerator::new(1024, SALT, 0, WallClock);
    assert_eq!(overflow.shard_id(), 0);
}

#[test]
fn future_epoch_is_clamped_and_recent_epoch_kept() {
    let future = unix_millis() + rand::rng().random_range(2_000..=1_000_000);
    let clamped = BasicDuidGenerator::new(0, SALT, future, WallClock);
    assert_eq!(clamped.epoch_start(), 0);

    let near = unix_millis() - rand::rng().random_range(1..=2);
    let kept = BasicDuidGenerator::new(0, SALT, near, WallClock);
    assert_eq!(kept.epoch_start(), near);
}

#[test]
fn current_time_reflects_drift() {
    let generator = BasicDuidGenerator::new(0, SALT, 0, MockTime { millis: 10_000 });
    assert_eq!(generator.current_time_ms(), 10_000);
    assert_eq!(generator.drift_time(-3_000), -3_000);
    assert_eq!(generator.current_time_ms(), 7_000);
    assert_eq!(generator.elapsed_millis(), 7_000);
}

#[test]
fn no_duplicates_within_and_across_instances() {
    let instance1 = BasicDuidGenerator::new(123, SALT, SHORT_DUID_EPOCH, WallClock);
    let instance2 = BasicDuidGenerator::new(12, SALT, SHORT_DUID_EPOCH, WallClock);

    let res1 = instance1.get_duid(8192).unwrap();
    let res2 = instance2.get_duid(8192).unwrap();
    let res3 = instance1.get_duid(8192).unwrap();
    assert_eq!(assert_all_unique(res1.iter()), 8192);
    assert_eq!(assert_all_unique(res2.iter()), 8192);
    assert_eq!(assert_all_unique(res3.iter()), 8192);
    assert_eq!(assert_all_unique(res1.iter().chain(&res2).chain(&res3)), 3 * 8192);

    let ints1 = instance1.get_duid_int(8192).unwrap();
    let ints2 = instance2.get_duid_int(8192).unwrap();
    let ints3 = instance1.get_duid_int(8192).unwrap();
    assert_eq!(
        assert_all_unique(ints1.iter().chain(&ints2).chain(&ints3)),
        3 * 8192
    );
}

#[test]
fn unique_under_constant_backward_drift() {
    const ROUNDS: usize = 10;

    let generator = BasicDuidGenerator::new(123, SALT, SHORT_DUID_EPOCH, WallClock);
    let mut drift = generator.drift_time(0);
    let mut rounds = Vec::with_capacity(ROUNDS);

    for _ in 0..ROUNDS {
        generator.drift_time(drift);
        let start = unix_millis();
        let ids = generator.get_duid_int(8192).unwrap();
        // Rewind by at least the time this round took, so the next round
        // starts at or before where this one began.
        drift = start - unix_millis() - 1;
        assert!(drift < 0);
        assert_eq!(ids.len(), 8192);
        assert_eq!(assert_all_unique(ids.iter()), 8192);
        rounds.push(ids);
    }

    let last_of_each: Vec<_> = rounds.iter().map(|ids| ids[8191]).collect();
    assert_strictly_increasing(&last_of_each);
    assert_eq!(assert_all_unique(rounds.iter().flatten()), 8192 * ROUNDS);
}

#[test]
fn epoch_before_1970_is_kept_and_measured_from() {
    let generator = BasicDuidGenerator::new(1, SALT, -86_400_000, MockTime { millis: 1_000 });
    assert_eq!(generator.epoch_start(), -86_400_000);
    assert_eq!(generator.elapsed_millis(), 86_401_000);

    let id = generator.try_next_id().unwrap();
    assert_eq!(id.timestamp(), 86_401_000);
}

#[test]
fn epoch_too_far_back_overflows_at_generation() {
    let generator = LockDuidGenerator::new(
        0,
        SALT,
        -1_000_000_000_000,
        MockTime {
            millis: 2_000_000_000_000,
        },
    );
    assert_eq!(generator.epoch_start(), -1_000_000_000_000);
    assert!(matches!(
        generator.try_next_id(),
        Err(Error::TimestampOverflow { .. })
    ));
}

#[test]
fn overflowing_virtual_time_is_an_error() {
    let beyond = i64::try_from(DuidId::max_timestamp() + 1).unwrap();
    let generator = BasicDuidGenerator::new(0, SALT, 0, MockTime { millis: beyond });
    assert!(matches!(
        generator.try_next_id(),
        Err(Error::TimestampOverflow { .. })
    ));
}

#[test]
fn forced_advance_past_layout_is_an_error() {
    let config = DuidConfig::with_now(3, SALT, 0, 0);
    let last = DuidId::from(DuidId::max_timestamp(), 0, DuidId::max_sequence());
    let generator = LockDuidGenerator::from_state(config, last, MockTime { millis: 0 });
    assert!(matches!(
        generator.try_next_id(),
        Err(Error::TimestampOverflow { .. })
    ));
}

#[test]
fn from_state_resumes_after_last_id_with_configured_shard() {
    let config = DuidConfig::with_now(77, SALT, 0, 0);
    let last = DuidId::from(500, 1, 10);
    let generator = BasicDuidGenerator::from_state(config, last, MockTime { millis: 400 });

    let next = generator.try_next_id().unwrap();
    assert_eq!(
        (next.timestamp(), next.shard_id(), next.sequence()),
        (500, 77, 11)
    );
}

#[test]
fn encoded_ids_decode_back_with_the_same_salt() {
    let generator = BasicDuidGenerator::new(321, SALT, SHORT_DUID_EPOCH, WallClock);
    for id in generator.generate(1_000).unwrap() {
        let encoded = generator.encode(id);
        assert!(encoded.len() <= id.to_string().len());
        assert_eq!(generator.encoder().decode_id(&encoded).unwrap(), id);
    }
}

#[test]
fn generators_sharing_a_salt_encode_identically() {
    let a = BasicDuidGenerator::new(1, "a", SHORT_DUID_EPOCH, WallClock);
    let b = LockDuidGenerator::new(2, "a", SHORT_DUID_EPOCH, WallClock);
    let id = DuidId::from(123_456, 1, 7);
    assert_eq!(a.encode(id), b.encode(id));
}
