//! The Fortuna generator: entropy routing, reseed scheduling, and the
//! AES-256-CTR output stage.
//!
//! Architecture:
//! 1. Submissions are routed round-robin per source into the pool bank
//! 2. The readiness oracle gates output on a paranoia-indexed bit threshold
//! 3. Reseeds fold a prefix of pool digests plus platform words into the key
//! 4. Output is AES-256 over a 128-bit counter, rekeyed from its own output
//!    at burst boundaries and after every call
//!
//! The reseed schedule is the classic Fortuna cascade: pool `i` takes part
//! in one of every `2^i` reseeds, so later pools accumulate entropy an
//! attacker must outguess over exponentially longer horizons. The departure
//! from classic Fortuna is the fast-start accounting: readiness is reached
//! from collector submissions alone, without a persisted seed file.
//!
//! The generator is single-threaded by design. All operations complete
//! synchronously; hosts that need sharing wrap an instance in a `Mutex`
//! (see [`crate::global`]).

use std::sync::Arc;

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes256;
use zeroize::Zeroize;

use crate::entropy::{EntropyInput, SourceRegistry};
use crate::error::Error;
use crate::events::{Event, EventDispatcher, EventKind, ListenerId};
use crate::platform::Platform;
use crate::pool::{HashPool, PoolBank};
use crate::readiness::{Paranoia, ReadyState};

/// Words emitted between two gates of the output cipher.
pub const MAX_WORDS_PER_BURST: usize = 65536;

/// Minimum wall-clock spacing between scheduled reseeds.
pub const MILLISECONDS_PER_RESEED: u64 = 30_000;

/// Pool-0 bits that make a scheduled reseed worthwhile.
pub const BITS_PER_RESEED: u64 = 80;

/// Platform random words mixed into every reseed.
const PLATFORM_WORDS_PER_RESEED: usize = 16;

/// Platform random words pumped on the first collector start, credited one
/// bit each.
const INIT_PLATFORM_WORDS: usize = 48;

/// A fast-start Fortuna CSPRNG.
///
/// Created cold: the working key is zero and output requests fail with
/// [`Error::NotReady`] until entropy submissions push the generator past the
/// threshold of its paranoia level.
pub struct Fortuna {
    bank: PoolBank,
    registry: SourceRegistry,
    events: EventDispatcher,
    platform: Box<dyn Platform + Send>,

    event_seq: u64,
    key: [u32; 8],
    counter: [u32; 4],
    cipher: Option<Aes256>,

    reseed_count: u64,
    working_strength: u64,
    pool_strength: u64,
    next_reseed: u64,

    default_paranoia: Paranoia,
    collectors_started: bool,
    init_pump_done: bool,
}

impl Fortuna {
    /// A cold generator on the system clock and OS random primitive, at the
    /// default paranoia level (256 bits).
    pub fn new() -> Self {
        Self::with_platform(Box::new(crate::platform::SystemPlatform))
    }

    /// A cold generator on a caller-supplied [`Platform`].
    pub fn with_platform(platform: Box<dyn Platform + Send>) -> Self {
        Self {
            bank: PoolBank::new(),
            registry: SourceRegistry::new(),
            events: EventDispatcher::new(),
            platform,
            event_seq: 0,
            key: [0; 8],
            counter: [0; 4],
            cipher: None,
            reseed_count: 0,
            working_strength: 0,
            pool_strength: 0,
            next_reseed: 0,
            default_paranoia: Paranoia::DEFAULT,
            collectors_started: false,
            init_pump_done: false,
        }
    }

    // -----------------------------------------------------------------------
    // Entropy intake
    // -----------------------------------------------------------------------

    /// Submit entropy from a named source.
    ///
    /// `estimated_bits` is the caller's conservative estimate of how much
    /// real entropy the payload carries; when omitted, a type-dependent
    /// default applies (see [`EntropyInput`]). The submission is absorbed
    /// into one pool, chosen round-robin per source, together with a header
    /// binding the source id, a monotone sequence number, the clock, and one
    /// platform random word.
    pub fn add_entropy<'a>(
        &mut self,
        data: impl Into<EntropyInput<'a>>,
        estimated_bits: Option<u64>,
        source: &str,
    ) {
        let data = data.into();
        let t = self.platform.now_ms();
        let r = self.platform.random_word();
        let was = self.is_ready(None);

        let bits = estimated_bits.unwrap_or_else(|| data.default_bits());
        let id = self.registry.id(source);
        let robin = self.registry.next_robin(source, self.bank.count());
        let seq = self.next_seq();

        let header = [
            id,
            seq,
            data.type_tag(),
            bits as u32,
            t as u32,
            r,
            data.header_len(),
        ];
        let pool = self.bank.pool_mut(robin);
        pool.update_words(&header);
        match data {
            EntropyInput::Word(w) => pool.update_words(&[w]),
            EntropyInput::Words(words) => pool.update_words(words),
            EntropyInput::Text(s) => pool.update_bytes(s.as_bytes()),
        }

        self.bank.credit(robin, bits);
        self.pool_strength += bits;

        if was == ReadyState::NOT_READY {
            if self.is_ready(None) != ReadyState::NOT_READY {
                let available = self.working_strength.max(self.pool_strength);
                self.events.fire(&Event::Seeded(available));
            }
            self.events.fire(&Event::Progress(self.progress(None)));
        }
    }

    fn next_seq(&mut self) -> u32 {
        let seq = self.event_seq;
        self.event_seq += 1;
        seq as u32
    }

    // -----------------------------------------------------------------------
    // Readiness
    // -----------------------------------------------------------------------

    /// Readiness at the given (or default) paranoia level.
    pub fn is_ready(&self, paranoia: Option<Paranoia>) -> ReadyState {
        let need = self.need(paranoia);
        if self.working_strength >= need {
            if self.bank.bits(0) > BITS_PER_RESEED && self.platform.now_ms() > self.next_reseed {
                ReadyState::RESEED_READY
            } else {
                ReadyState::READY
            }
        } else if self.pool_strength >= need {
            ReadyState::RESEED_NOT_READY
        } else {
            ReadyState::NOT_READY
        }
    }

    /// Seeding progress in `[0.0, 1.0]` at the given (or default) paranoia
    /// level. Reaches 1.0 as soon as pooled entropy covers the requirement,
    /// even before a reseed moves it into the key.
    pub fn progress(&self, paranoia: Option<Paranoia>) -> f64 {
        let need = self.need(paranoia);
        if self.working_strength >= need || self.pool_strength > need {
            1.0
        } else {
            self.pool_strength as f64 / need as f64
        }
    }

    /// Change the default paranoia level for calls that do not pass one.
    pub fn set_default_paranoia(&mut self, paranoia: Paranoia) {
        self.default_paranoia = paranoia;
    }

    fn need(&self, paranoia: Option<Paranoia>) -> u64 {
        paranoia.unwrap_or(self.default_paranoia).required_bits()
    }

    // -----------------------------------------------------------------------
    // Reseed engine
    // -----------------------------------------------------------------------

    /// Fold pool digests and platform words into the working key.
    ///
    /// A partial reseed drains the pool-`i` prefix dictated by the Fortuna
    /// cascade: the loop stops after the first pool whose index bit is set
    /// in the pre-increment reseed count, so pool `i` is consumed in one of
    /// every `2^i` reseeds. A full reseed drains every pool.
    pub(crate) fn reseed_from_pools(&mut self, full: bool) {
        let now = self.platform.now_ms();
        self.next_reseed = now + MILLISECONDS_PER_RESEED;

        let mut seed: Vec<u32> =
            Vec::with_capacity(1 + PLATFORM_WORDS_PER_RESEED + 8 * self.bank.count());
        seed.push(self.next_reseed as u32);
        for _ in 0..PLATFORM_WORDS_PER_RESEED {
            seed.push(self.platform.random_word());
        }

        let prior = self.reseed_count;
        let mut strength = 0u64;
        for i in 0..self.bank.count() {
            let (digest, bits) = self.bank.drain(i);
            seed.extend_from_slice(&digest);
            strength += bits;
            if !full && prior & (1 << i) != 0 {
                break;
            }
        }

        // Once the schedule has consumed the last pool, open a new one.
        if self.reseed_count + 1 >= 1u64 << self.bank.count() {
            self.bank.grow();
        }

        self.pool_strength -= strength;
        if strength > self.working_strength {
            self.working_strength = strength;
        }
        self.reseed_count += 1;

        // key := SHA-256(key ++ seed)
        let mut hasher = HashPool::new();
        hasher.update_words(&self.key);
        hasher.update_words(&seed);
        let new_key = hasher.drain();
        seed.zeroize();
        self.key.zeroize();
        self.key = new_key;
        self.install_cipher();
        self.increment_counter();
    }

    fn install_cipher(&mut self) {
        let mut key_bytes = [0u8; 32];
        for (chunk, w) in key_bytes.chunks_exact_mut(4).zip(self.key) {
            chunk.copy_from_slice(&w.to_be_bytes());
        }
        self.cipher = Some(Aes256::new(GenericArray::from_slice(&key_bytes)));
        key_bytes.zeroize();
    }

    /// 128-bit little-endian-word increment: bump `counter[0]`, carry into
    /// the next word on wrap.
    fn increment_counter(&mut self) {
        for w in self.counter.iter_mut() {
            *w = w.wrapping_add(1);
            if *w != 0 {
                break;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Output stage
    // -----------------------------------------------------------------------

    /// Produce exactly `nwords` random 32-bit words.
    ///
    /// Fails with [`Error::NotReady`] unless the readiness oracle grants
    /// output at the given (or default) paranoia level; performs the due
    /// scheduled reseed first when one is flagged. The cipher is rekeyed
    /// from its own output every [`MAX_WORDS_PER_BURST`] words and once more
    /// before returning, so the key that produced this output cannot be
    /// recovered from any later state.
    pub fn random_words(
        &mut self,
        nwords: usize,
        paranoia: Option<Paranoia>,
    ) -> Result<Vec<u32>, Error> {
        let state = self.is_ready(paranoia);
        if !state.is_ready() {
            let level = paranoia.unwrap_or(self.default_paranoia);
            return Err(Error::NotReady {
                level: level.level(),
                need: level.required_bits(),
                have: self.working_strength,
            });
        }
        if state.requires_reseed() || self.cipher.is_none() {
            // The second arm only triggers at paranoia 0 before any reseed
            // has run: a zero-strength reseed instates the cipher.
            self.reseed_from_pools(false);
        }

        let mut out = Vec::with_capacity(nwords + 4);
        while out.len() < nwords {
            let block = self.gen4();
            out.extend_from_slice(&block);
            if out.len() % MAX_WORDS_PER_BURST == 0 {
                self.gate();
            }
        }
        self.gate();
        out.truncate(nwords);
        Ok(out)
    }

    /// Produce exactly `nbytes` random bytes (big-endian packing of
    /// [`Self::random_words`] output).
    pub fn random_bytes(
        &mut self,
        nbytes: usize,
        paranoia: Option<Paranoia>,
    ) -> Result<Vec<u8>, Error> {
        let words = self.random_words(nbytes.div_ceil(4), paranoia)?;
        let mut bytes = Vec::with_capacity(words.len() * 4);
        for w in words {
            bytes.extend_from_slice(&w.to_be_bytes());
        }
        bytes.truncate(nbytes);
        Ok(bytes)
    }

    /// One counter-mode block: bump the counter, encrypt it.
    fn gen4(&mut self) -> [u32; 4] {
        self.increment_counter();

        let mut block = [0u8; 16];
        for (chunk, w) in block.chunks_exact_mut(4).zip(self.counter) {
            chunk.copy_from_slice(&w.to_be_bytes());
        }
        let mut block = GenericArray::from(block);
        let cipher = self
            .cipher
            .as_ref()
            .expect("reseed installs the cipher before any output");
        cipher.encrypt_block(&mut block);

        let mut words = [0u32; 4];
        for (w, chunk) in words.iter_mut().zip(block.chunks_exact(4)) {
            *w = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        words
    }

    /// Rekey the cipher from its own next two blocks. After a gate, the
    /// previous key cannot be derived from anything the generator still
    /// holds.
    fn gate(&mut self) {
        let a = self.gen4();
        let b = self.gen4();
        self.key.zeroize();
        self.key = [a[0], a[1], a[2], a[3], b[0], b[1], b[2], b[3]];
        self.install_cipher();
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Register a listener for `progress` or `seeded`. Listeners run
    /// synchronously inside the `add_entropy` call that triggers them and
    /// must not call back into the generator.
    pub fn add_listener<F>(&mut self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.events.add(kind, Arc::new(callback))
    }

    /// Unregister a listener; returns whether it was registered.
    pub fn remove_listener(&mut self, kind: EventKind, id: ListenerId) -> bool {
        self.events.remove(kind, id)
    }

    // -----------------------------------------------------------------------
    // Collector lifecycle
    // -----------------------------------------------------------------------

    /// Mark host collectors as running. Idempotent. The first start also
    /// pumps [`INIT_PLATFORM_WORDS`] platform random words through the
    /// router, credited one bit each, so the generator makes progress even
    /// before any host events arrive.
    pub fn start_collectors(&mut self) {
        if self.collectors_started {
            return;
        }
        self.collectors_started = true;
        if !self.init_pump_done {
            self.init_pump_done = true;
            for _ in 0..INIT_PLATFORM_WORDS {
                let word = self.platform.random_word();
                self.add_entropy(word, Some(1), "init");
            }
        }
    }

    /// Mark host collectors as stopped. Idempotent.
    pub fn stop_collectors(&mut self) {
        self.collectors_started = false;
    }

    /// Whether host collectors are currently running.
    pub fn collectors_started(&self) -> bool {
        self.collectors_started
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Completed reseeds.
    pub fn reseed_count(&self) -> u64 {
        self.reseed_count
    }

    /// Pools currently in the bank.
    pub fn pool_count(&self) -> usize {
        self.bank.count()
    }

    /// Bits credited to one pool since its last drain.
    pub fn pool_bits(&self, pool: usize) -> u64 {
        self.bank.bits(pool)
    }

    /// Bits delivered into the key by the strongest reseed so far.
    pub fn working_strength(&self) -> u64 {
        self.working_strength
    }

    /// Bits currently resident across all pools.
    pub fn pool_strength(&self) -> u64 {
        self.pool_strength
    }

    /// Current rotation position for a source, if it has ever submitted.
    pub fn robin(&self, source: &str) -> Option<usize> {
        self.registry.robin(source)
    }

    #[cfg(test)]
    pub(crate) fn key_words(&self) -> [u32; 8] {
        self.key
    }
}

impl Default for Fortuna {
    fn default() -> Self {
        Self::new()
    }
}
