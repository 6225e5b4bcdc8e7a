// ============================================================
// Layer 6 — Persistent Model Store
// ============================================================
// The model lives in one flat binary file that is memory
// mapped, so training writes straight into the page cache and
// the OS takes care of getting it to disk.
//
// File layout (32-byte header, then f32 payload):
//
//   offset  size  field
//   ------  ----  -----------------------------------------
//        0     4  magic        b"DRBM"
//        4     4  flags        [0] = visible unit kind, rest 0
//        8     8  nvis         u64
//       16     8  nhid         u64
//       24     8  data_offset  u64, floats skipped before payload
//       32     …  payload      vbias[nvis] hbias[nhid] w[nvis×nhid]
//
// w is row-major (visible-major): w[i*nhid + j] connects
// visible unit i with hidden unit j.
//
// Besides the mapping the store owns the transposed weights
// (hidden-major, wt[j*nvis + i] == w[i*nhid + j]). Propagating
// upwards reads one contiguous row of wt per hidden unit. The
// cache is rebuilt on open and resize; everything that changes
// w in place must keep it in step (see ParamsMut).
//
// Resize grows or shrinks both layers at once:
//   1. Snapshot the current parameters
//   2. Truncate/extend the file, map it again read-write
//   3. Copy vbias → hbias → the overlapping block of w back
//   4. New vbias  = ln(0.1 · U),   U ~ (0, 1]
//      New hbias  = 0.01 · Z,      Z ~ N(0, 1)
//      New w      = Z / (nvis·nhid)
//   5. Rebuild the transposed cache, write the new dimensions
//
// Reference: memmap2 crate documentation
//            bytemuck crate documentation (Pod casts)

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use memmap2::{Mmap, MmapMut, MmapOptions};

use crate::domain::policy::VisibleUnits;
use crate::domain::traits::Sampler;
use crate::infra::error::StoreError;

// ─── Constants ────────────────────────────────────────────────────────────────
pub const MAGIC: [u8; 4] = *b"DRBM";
pub const HEADER_SIZE: usize = std::mem::size_of::<FileHeader>();

/// Scale of the uniform draw behind a new visible bias
const VBIAS_NOISE: f32 = 0.1;
/// Standard deviation of a new hidden bias
const HBIAS_NOISE: f32 = 0.01;

// ─── FileHeader ───────────────────────────────────────────────────────────────
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct FileHeader {
    pub magic:       [u8; 4],
    pub flags:       [u8; 4],
    pub nvis:        u64,
    pub nhid:        u64,
    pub data_offset: u64,
}

impl FileHeader {
    fn empty(units: VisibleUnits) -> Self {
        Self {
            magic:       MAGIC,
            flags:       [units.to_flag(), 0, 0, 0],
            nvis:        0,
            nhid:        0,
            data_offset: 0,
        }
    }
}

// ─── PayloadLayout ────────────────────────────────────────────────────────────
/// Where each array sits in the mapping. Built once per open/resize,
/// with all arithmetic checked, and never recomputed in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PayloadLayout {
    data_offset: usize,
    nvis:        usize,
    nhid:        usize,
    /// Byte offset of vbias[0]
    start:       usize,
    /// Byte offset one past the last weight
    end:         usize,
}

impl PayloadLayout {
    fn new(data_offset: u64, nvis: u64, nhid: u64) -> Option<Self> {
        let data_offset = usize::try_from(data_offset).ok()?;
        let nvis        = usize::try_from(nvis).ok()?;
        let nhid        = usize::try_from(nhid).ok()?;

        let floats = nvis
            .checked_mul(nhid)?
            .checked_add(nvis)?
            .checked_add(nhid)?;
        let start = data_offset.checked_mul(4)?.checked_add(HEADER_SIZE)?;
        let end   = floats.checked_mul(4)?.checked_add(start)?;

        Some(Self { data_offset, nvis, nhid, start, end })
    }

    fn weight_count(&self) -> usize {
        self.nvis * self.nhid
    }
}

// ─── Mapping ──────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    ReadWrite,
}

enum Mapping {
    ReadOnly(Mmap),
    ReadWrite(MmapMut),
}

impl Mapping {
    fn bytes(&self) -> &[u8] {
        match self {
            Mapping::ReadOnly(m)  => &m[..],
            Mapping::ReadWrite(m) => &m[..],
        }
    }
}

// ─── Views ────────────────────────────────────────────────────────────────────
/// Read-only view of all parameters, handed to the Gibbs primitives.
#[derive(Debug, Clone, Copy)]
pub struct ModelView<'a> {
    pub nvis:               usize,
    pub nhid:               usize,
    pub units:              VisibleUnits,
    pub vbias:              &'a [f32],
    pub hbias:              &'a [f32],
    /// nvis × nhid, visible-major
    pub weights:            &'a [f32],
    /// nhid × nvis, hidden-major
    pub weights_transposed: &'a [f32],
}

/// Mutable access to all parameters at once.
///
/// Whoever writes to `weights` through this view must mirror the
/// change into `weights_transposed`, or call
/// `ModelStore::refresh_transposed` once the view is dropped.
pub struct ParamsMut<'a> {
    pub nvis:               usize,
    pub nhid:               usize,
    pub vbias:              &'a mut [f32],
    pub hbias:              &'a mut [f32],
    pub weights:            &'a mut [f32],
    pub weights_transposed: &'a mut [f32],
}

// ─── ModelStore ───────────────────────────────────────────────────────────────
pub struct ModelStore {
    path:       PathBuf,
    file:       File,
    mode:       OpenMode,
    map:        Mapping,
    header:     FileHeader,
    layout:     PayloadLayout,
    units:      VisibleUnits,
    transposed: Vec<f32>,
}

impl ModelStore {
    /// Create (or truncate) `path` as a model with zero-sized layers.
    ///
    /// The file holds only the header afterwards; call `resize` to give
    /// the machine its dimensions.
    pub fn create(path: impl AsRef<Path>, units: VisibleUnits) -> Result<Self, StoreError> {
        let path = path.as_ref();

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(StoreError::io(path))?;

        file.write_all(bytemuck::bytes_of(&FileHeader::empty(units)))
            .map_err(StoreError::io(path))?;
        drop(file);

        tracing::debug!("Created empty model file '{}'", path.display());
        Self::open(path, OpenMode::ReadWrite)
    }

    /// Create `path` and resize it straight to `nvis × nhid`.
    pub fn create_with_dimensions(
        path:    impl AsRef<Path>,
        units:   VisibleUnits,
        nvis:    usize,
        nhid:    usize,
        sampler: &mut impl Sampler,
    ) -> Result<Self, StoreError> {
        let mut store = Self::create(path, units)?;
        store.resize(nvis, nhid, sampler)?;
        Ok(store)
    }

    /// Map an existing model file.
    ///
    /// Validates the header and the payload length, then builds the
    /// transposed weight cache (O(nvis·nhid), once per open).
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self, StoreError> {
        let path = path.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(mode == OpenMode::ReadWrite)
            .open(path)
            .map_err(StoreError::io(path))?;

        let size = file.metadata().map_err(StoreError::io(path))?.len();
        if size < HEADER_SIZE as u64 {
            return Err(StoreError::format(
                path,
                format!("file is {} bytes, smaller than the {}-byte header", size, HEADER_SIZE),
            ));
        }

        // SAFETY: the model file has a single writer (this process); the
        // mapping is dropped before the file is resized again.
        let map = match mode {
            OpenMode::ReadOnly => Mapping::ReadOnly(
                unsafe { Mmap::map(&file) }.map_err(StoreError::io(path))?,
            ),
            OpenMode::ReadWrite => Mapping::ReadWrite(
                unsafe { MmapMut::map_mut(&file) }.map_err(StoreError::io(path))?,
            ),
        };

        let header: FileHeader = bytemuck::pod_read_unaligned(&map.bytes()[..HEADER_SIZE]);
        if header.magic != MAGIC {
            return Err(StoreError::format(path, format!("bad magic {:?}", header.magic)));
        }
        let units = VisibleUnits::from_flag(header.flags[0]).ok_or_else(|| {
            StoreError::format(path, format!("unknown visible unit kind {}", header.flags[0]))
        })?;
        let layout = PayloadLayout::new(header.data_offset, header.nvis, header.nhid)
            .ok_or_else(|| StoreError::format(path, "dimensions overflow the address space"))?;
        if layout.end > map.bytes().len() {
            return Err(StoreError::format(
                path,
                format!(
                    "payload for {}x{} needs {} bytes, file has {}",
                    layout.nvis,
                    layout.nhid,
                    layout.end,
                    map.bytes().len()
                ),
            ));
        }

        let mut store = Self {
            path: path.to_path_buf(),
            file,
            mode,
            map,
            header,
            layout,
            units,
            transposed: Vec::new(),
        };
        store.refresh_transposed();

        tracing::debug!(
            "Opened model '{}' ({}x{}, {:?})",
            path.display(),
            store.nvis(),
            store.nhid(),
            mode
        );
        Ok(store)
    }

    /// Grow or shrink the machine to `nvis × nhid`.
    ///
    /// Parameters inside the old bounds keep their values (the weight
    /// block w[i][j] for i < min(nvis), j < min(nhid)); everything new
    /// is drawn from `sampler`. Entries beyond the new bounds are cut
    /// off with the file.
    pub fn resize(
        &mut self,
        nvis:    usize,
        nhid:    usize,
        sampler: &mut impl Sampler,
    ) -> Result<(), StoreError> {
        if self.mode == OpenMode::ReadOnly {
            return Err(StoreError::ReadOnly { path: self.path.clone() });
        }

        let old = self.layout;
        let layout = PayloadLayout::new(old.data_offset as u64, nvis as u64, nhid as u64)
            .ok_or_else(|| StoreError::format(&self.path, "dimensions overflow the address space"))?;

        // ── Step 1: snapshot what survives ────────────────────────────────────
        let old_vbias   = self.vbias().to_vec();
        let old_hbias   = self.hbias().to_vec();
        let old_weights = self.weights().to_vec();

        // ── Step 2: new file size, new read-write mapping ─────────────────────
        self.file
            .set_len(layout.end as u64)
            .map_err(StoreError::io(&self.path))?;
        // SAFETY: see open(); the old mapping is replaced right here and
        // never read again.
        let map = unsafe { MmapOptions::new().map_mut(&self.file) }
            .map_err(StoreError::io(&self.path))?;
        self.map    = Mapping::ReadWrite(map);
        self.layout = layout;

        // ── Steps 3–4: copy the overlap, wobble the rest ──────────────────────
        {
            let params = self.params_mut()?;

            let keep = old.nvis.min(nvis);
            params.vbias[..keep].copy_from_slice(&old_vbias[..keep]);
            for b in &mut params.vbias[keep..] {
                *b = (VBIAS_NOISE * sampler.uniform()).ln();
            }

            let keep = old.nhid.min(nhid);
            params.hbias[..keep].copy_from_slice(&old_hbias[..keep]);
            for b in &mut params.hbias[keep..] {
                *b = HBIAS_NOISE * sampler.normal();
            }

            let wnoise = 1.0 / (layout.weight_count().max(1) as f32);
            for i in 0..nvis {
                for j in 0..nhid {
                    params.weights[i * nhid + j] = if i < old.nvis && j < old.nhid {
                        old_weights[i * old.nhid + j]
                    } else {
                        wnoise * sampler.normal()
                    };
                }
            }
        }

        // ── Step 5: transposed cache and header ───────────────────────────────
        self.refresh_transposed();
        self.header.nvis = nvis as u64;
        self.header.nhid = nhid as u64;
        self.write_header()?;

        tracing::info!(
            "Resized model '{}' from {}x{} to {}x{}",
            self.path.display(),
            old.nvis,
            old.nhid,
            nvis,
            nhid
        );
        Ok(())
    }

    /// Rebuild the transposed weights from the canonical matrix.
    pub fn refresh_transposed(&mut self) {
        let (nvis, nhid) = (self.layout.nvis, self.layout.nhid);
        let mut transposed = std::mem::take(&mut self.transposed);

        transposed.clear();
        transposed.resize(nvis * nhid, 0.0);
        transpose_into(&mut transposed, self.weights(), nvis, nhid);

        self.transposed = transposed;
    }

    /// msync the mapping so the parameters are on disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        match &self.map {
            Mapping::ReadWrite(m) => m.flush().map_err(StoreError::io(&self.path)),
            Mapping::ReadOnly(_)  => Ok(()),
        }
    }

    /// Flush and unmap. The file itself stays on disk.
    ///
    /// Consuming `self` makes a second close impossible.
    pub fn close(self) -> Result<(), StoreError> {
        self.flush()?;
        tracing::debug!("Closed model '{}'", self.path.display());
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn nvis(&self) -> usize {
        self.layout.nvis
    }

    pub fn nhid(&self) -> usize {
        self.layout.nhid
    }

    pub fn units(&self) -> VisibleUnits {
        self.units
    }

    pub fn header(&self) -> FileHeader {
        self.header
    }

    pub fn vbias(&self) -> &[f32] {
        &self.payload()[..self.layout.nvis]
    }

    pub fn hbias(&self) -> &[f32] {
        let nvis = self.layout.nvis;
        &self.payload()[nvis..nvis + self.layout.nhid]
    }

    pub fn weights(&self) -> &[f32] {
        &self.payload()[self.layout.nvis + self.layout.nhid..]
    }

    pub fn weights_transposed(&self) -> &[f32] {
        &self.transposed
    }

    /// Borrow every parameter read-only
    pub fn view(&self) -> ModelView<'_> {
        ModelView {
            nvis:               self.nvis(),
            nhid:               self.nhid(),
            units:              self.units,
            vbias:              self.vbias(),
            hbias:              self.hbias(),
            weights:            self.weights(),
            weights_transposed: &self.transposed,
        }
    }

    /// Borrow every parameter mutably; fails on read-only stores
    pub fn params_mut(&mut self) -> Result<ParamsMut<'_>, StoreError> {
        let layout = self.layout;
        let bytes = match &mut self.map {
            Mapping::ReadWrite(m) => &mut m[layout.start..layout.end],
            Mapping::ReadOnly(_)  => {
                return Err(StoreError::ReadOnly { path: self.path.clone() });
            }
        };

        let floats: &mut [f32] = bytemuck::cast_slice_mut(bytes);
        let (vbias, rest)    = floats.split_at_mut(layout.nvis);
        let (hbias, weights) = rest.split_at_mut(layout.nhid);

        Ok(ParamsMut {
            nvis: layout.nvis,
            nhid: layout.nhid,
            vbias,
            hbias,
            weights,
            weights_transposed: &mut self.transposed,
        })
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn payload(&self) -> &[f32] {
        bytemuck::cast_slice(&self.map.bytes()[self.layout.start..self.layout.end])
    }

    fn write_header(&mut self) -> Result<(), StoreError> {
        let header = self.header;
        match &mut self.map {
            Mapping::ReadWrite(m) => {
                m[..HEADER_SIZE].copy_from_slice(bytemuck::bytes_of(&header));
                Ok(())
            }
            Mapping::ReadOnly(_) => Err(StoreError::ReadOnly { path: self.path.clone() }),
        }
    }
}

/// wt[j*nvis + i] = w[i*nhid + j]
pub fn transpose_into(target: &mut [f32], weights: &[f32], nvis: usize, nhid: usize) {
    assert_eq!(weights.len(), nvis * nhid);
    assert_eq!(target.len(), nvis * nhid);

    for i in 0..nvis {
        for j in 0..nhid {
            target[j * nvis + i] = weights[i * nhid + j];
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::sampler::RngSampler;
    use tempfile::TempDir;

    fn scratch() -> (TempDir, PathBuf) {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.rbm");
        (dir, path)
    }

    fn assert_transpose_invariant(store: &ModelStore) {
        let (nvis, nhid) = (store.nvis(), store.nhid());
        let w  = store.weights();
        let wt = store.weights_transposed();
        assert_eq!(wt.len(), nvis * nhid);
        for i in 0..nvis {
            for j in 0..nhid {
                assert_eq!(wt[j * nvis + i].to_bits(), w[i * nhid + j].to_bits());
            }
        }
    }

    #[test]
    fn test_header_is_32_bytes() {
        assert_eq!(HEADER_SIZE, 32);
    }

    #[test]
    fn test_create_is_header_only() {
        let (_dir, path) = scratch();
        let store = ModelStore::create(&path, VisibleUnits::ReplicatedSoftmax).unwrap();

        assert_eq!(store.nvis(), 0);
        assert_eq!(store.nhid(), 0);
        assert!(store.vbias().is_empty());
        assert!(store.weights().is_empty());
        store.close().unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().len(), HEADER_SIZE as u64);
    }

    #[test]
    fn test_create_then_open_round_trip() {
        let (_dir, path) = scratch();
        let mut sampler = RngSampler::seeded(42);

        let store = ModelStore::create_with_dimensions(
            &path, VisibleUnits::Exponential, 20, 8, &mut sampler,
        ).unwrap();
        let weights = store.weights().to_vec();
        store.close().unwrap();

        let reopened = ModelStore::open(&path, OpenMode::ReadOnly).unwrap();
        assert_eq!(reopened.nvis(), 20);
        assert_eq!(reopened.nhid(), 8);
        assert_eq!(reopened.units(), VisibleUnits::Exponential);
        assert_eq!(reopened.weights(), &weights[..]);
        assert!(reopened.vbias().iter().all(|b| b.is_finite() && *b < 0.0));
        assert!(reopened.hbias().iter().all(|b| b.is_finite()));
        assert!(reopened.weights().iter().all(|w| w.is_finite()));
        assert_transpose_invariant(&reopened);

        let expected = HEADER_SIZE + 4 * (20 + 8 + 20 * 8);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), expected as u64);
    }

    #[test]
    fn test_open_rejects_short_file() {
        let (_dir, path) = scratch();
        std::fs::write(&path, b"DRBM").unwrap();

        match ModelStore::open(&path, OpenMode::ReadOnly) {
            Err(StoreError::Format { .. }) => {}
            other => panic!("expected format error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_open_rejects_bad_magic() {
        let (_dir, path) = scratch();
        std::fs::write(&path, [0u8; HEADER_SIZE]).unwrap();

        assert!(matches!(
            ModelStore::open(&path, OpenMode::ReadOnly),
            Err(StoreError::Format { .. })
        ));
    }

    #[test]
    fn test_open_rejects_truncated_payload() {
        let (_dir, path) = scratch();
        let mut sampler = RngSampler::seeded(1);
        ModelStore::create_with_dimensions(&path, VisibleUnits::default(), 4, 4, &mut sampler)
            .unwrap()
            .close()
            .unwrap();

        let file = OpenOptions::new().write(true).open(&path).unwrap();
        file.set_len(HEADER_SIZE as u64 + 8).unwrap();
        drop(file);

        assert!(matches!(
            ModelStore::open(&path, OpenMode::ReadWrite),
            Err(StoreError::Format { .. })
        ));
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let (_dir, path) = scratch();
        assert!(matches!(
            ModelStore::open(&path, OpenMode::ReadOnly),
            Err(StoreError::Io { .. })
        ));
    }

    #[test]
    fn test_resize_preserves_prefix() {
        let (_dir, path) = scratch();
        let mut sampler = RngSampler::seeded(7);
        let mut store = ModelStore::create_with_dimensions(
            &path, VisibleUnits::default(), 5, 3, &mut sampler,
        ).unwrap();

        // Known values everywhere
        {
            let p = store.params_mut().unwrap();
            for (i, b) in p.vbias.iter_mut().enumerate() { *b = i as f32; }
            for (j, b) in p.hbias.iter_mut().enumerate() { *b = 100.0 + j as f32; }
            for (k, w) in p.weights.iter_mut().enumerate() { *w = 1000.0 + k as f32; }
        }
        store.refresh_transposed();

        store.resize(8, 3, &mut sampler).unwrap();

        assert_eq!(&store.vbias()[..5], &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(store.hbias(), &[100.0, 101.0, 102.0]);
        for k in 0..15 {
            assert_eq!(store.weights()[k], 1000.0 + k as f32);
        }
        assert!(store.vbias()[5..].iter().all(|b| b.is_finite() && *b < 0.0));
        assert!(store.weights()[15..].iter().all(|w| w.is_finite() && w.abs() < 1.0));
        assert_transpose_invariant(&store);
    }

    #[test]
    fn test_resize_hidden_keeps_weight_block() {
        let (_dir, path) = scratch();
        let mut sampler = RngSampler::seeded(8);
        let mut store = ModelStore::create_with_dimensions(
            &path, VisibleUnits::default(), 3, 2, &mut sampler,
        ).unwrap();
        let before = store.weights().to_vec();

        store.resize(3, 4, &mut sampler).unwrap();

        for i in 0..3 {
            for j in 0..2 {
                assert_eq!(store.weights()[i * 4 + j], before[i * 2 + j]);
            }
        }
        assert_transpose_invariant(&store);
    }

    #[test]
    fn test_resize_shrink() {
        let (_dir, path) = scratch();
        let mut sampler = RngSampler::seeded(9);
        let mut store = ModelStore::create_with_dimensions(
            &path, VisibleUnits::default(), 6, 4, &mut sampler,
        ).unwrap();
        let vbias   = store.vbias().to_vec();
        let weights = store.weights().to_vec();

        store.resize(2, 3, &mut sampler).unwrap();

        assert_eq!(store.vbias(), &vbias[..2]);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(store.weights()[i * 3 + j], weights[i * 4 + j]);
            }
        }
        assert_transpose_invariant(&store);
        store.close().unwrap();

        let expected = HEADER_SIZE + 4 * (2 + 3 + 2 * 3);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), expected as u64);
    }

    #[test]
    fn test_new_parameters_follow_their_distributions() {
        let (_dir, path) = scratch();
        let mut sampler = RngSampler::seeded(42);
        let store = ModelStore::create_with_dimensions(
            &path, VisibleUnits::default(), 200, 50, &mut sampler,
        ).unwrap();

        let mean = |xs: &[f32]| xs.iter().sum::<f32>() / xs.len() as f32;

        // ln(0.1·U) ≤ ln(0.1) < 0
        assert!(store.vbias().iter().all(|&b| b <= 0.1f32.ln() + 1e-6));
        assert!(mean(store.hbias()).abs() < 0.01);
        assert!(mean(store.weights()).abs() < 1e-5);
    }

    #[test]
    fn test_read_only_store_refuses_writes() {
        let (_dir, path) = scratch();
        let mut sampler = RngSampler::seeded(3);
        ModelStore::create_with_dimensions(&path, VisibleUnits::default(), 2, 2, &mut sampler)
            .unwrap()
            .close()
            .unwrap();

        let mut store = ModelStore::open(&path, OpenMode::ReadOnly).unwrap();
        assert!(matches!(store.params_mut(), Err(StoreError::ReadOnly { .. })));
        assert!(matches!(
            store.resize(3, 3, &mut sampler),
            Err(StoreError::ReadOnly { .. })
        ));
    }

    #[test]
    fn test_writes_persist_after_close() {
        let (_dir, path) = scratch();
        let mut sampler = RngSampler::seeded(5);
        let mut store = ModelStore::create_with_dimensions(
            &path, VisibleUnits::default(), 2, 2, &mut sampler,
        ).unwrap();
        store.params_mut().unwrap().weights[3] = 0.25;
        store.close().unwrap();

        let store = ModelStore::open(&path, OpenMode::ReadOnly).unwrap();
        assert_eq!(store.weights()[3], 0.25);
        assert_eq!(store.weights_transposed()[3], 0.25);
    }
}
