//! Background shape loading.
//!
//! Loading is the only asynchronous step in the engine. The render loop keeps
//! running (camera only, empty scene) while the loader thread resolves every
//! shape; the result is picked up with a non-blocking poll once per frame.

use std::sync::mpsc;
use std::thread::JoinHandle;

use super::{ShapeSpec, ShapeStore};
use crate::error::MorphError;

/// Where a background load currently stands.
#[derive(Debug)]
pub enum LoadStatus {
    /// Still reading shape sources.
    Pending,
    /// Every shape resolved. Returned once; later polls report `Taken`.
    Ready(ShapeStore),
    /// The load failed. Returned once; later polls report `Taken`.
    Failed(MorphError),
    /// The result was already handed out.
    Taken,
}

/// Background thread that loads a full [`ShapeStore`].
pub struct ShapeLoader {
    result_rx: mpsc::Receiver<Result<ShapeStore, MorphError>>,
    thread: Option<JoinHandle<()>>,
    taken: bool,
}

impl ShapeLoader {
    /// Spawn the loader thread for `specs`.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::ThreadSpawn`] if the thread fails to spawn.
    pub fn spawn(specs: Vec<ShapeSpec>) -> Result<Self, MorphError> {
        let (result_tx, result_rx) = mpsc::channel();
        let thread = std::thread::Builder::new()
            .name("shape-loader".into())
            .spawn(move || {
                let _ = result_tx.send(ShapeStore::load(&specs));
            })
            .map_err(MorphError::ThreadSpawn)?;

        Ok(Self {
            result_rx,
            thread: Some(thread),
            taken: false,
        })
    }

    /// Loader whose result is already known. Used when shapes are supplied
    /// in memory.
    #[must_use]
    pub fn ready(store: ShapeStore) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let _ = result_tx.send(Ok(store));
        Self {
            result_rx,
            thread: None,
            taken: false,
        }
    }

    /// Non-blocking check for the load result.
    pub fn poll(&mut self) -> LoadStatus {
        if self.taken {
            return LoadStatus::Taken;
        }
        match self.result_rx.try_recv() {
            Ok(result) => {
                self.taken = true;
                self.join();
                match result {
                    Ok(store) => LoadStatus::Ready(store),
                    Err(e) => LoadStatus::Failed(e),
                }
            }
            Err(mpsc::TryRecvError::Empty) => LoadStatus::Pending,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.taken = true;
                self.join();
                LoadStatus::Failed(MorphError::shape_load(
                    "*",
                    "loader thread exited without a result",
                ))
            }
        }
    }

    /// Block until the load finishes.
    pub fn wait(&mut self) -> LoadStatus {
        if self.taken {
            return LoadStatus::Taken;
        }
        self.taken = true;
        let status = match self.result_rx.recv() {
            Ok(Ok(store)) => LoadStatus::Ready(store),
            Ok(Err(e)) => LoadStatus::Failed(e),
            Err(_) => LoadStatus::Failed(MorphError::shape_load(
                "*",
                "loader thread exited without a result",
            )),
        };
        self.join();
        status
    }

    fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ShapeLoader {
    fn drop(&mut self) {
        self.join();
    }
}

impl std::fmt::Debug for ShapeLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeLoader")
            .field("running", &self.thread.is_some())
            .field("taken", &self.taken)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::shape::tests::temp_file;
    use crate::shape::Shape;

    #[test]
    fn ready_loader_hands_out_store_once() {
        let store =
            ShapeStore::from_shapes([Shape::new("a", vec![Vec3::ZERO], Vec3::ONE)]);
        let mut loader = ShapeLoader::ready(store);
        assert!(matches!(loader.poll(), LoadStatus::Ready(s) if s.len() == 1));
        assert!(matches!(loader.poll(), LoadStatus::Taken));
    }

    #[test]
    fn background_load_succeeds() {
        let path = temp_file("loader-ok", "1,2,3\n");
        let mut loader = ShapeLoader::spawn(vec![ShapeSpec {
            name: "a".to_owned(),
            path,
            color: Vec3::ONE,
        }])
        .unwrap();
        assert!(matches!(loader.wait(), LoadStatus::Ready(s) if s.contains("a")));
    }

    #[test]
    fn background_load_reports_failure() {
        let path = temp_file("loader-bad", "1,2\n");
        let mut loader = ShapeLoader::spawn(vec![ShapeSpec {
            name: "bad".to_owned(),
            path,
            color: Vec3::ONE,
        }])
        .unwrap();
        assert!(matches!(
            loader.wait(),
            LoadStatus::Failed(MorphError::ShapeLoad { .. })
        ));
        assert!(matches!(loader.poll(), LoadStatus::Taken));
    }
}
