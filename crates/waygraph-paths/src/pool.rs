use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;
use waygraph_core::CompactGraph;

use crate::Searcher;

/// A shared free list of [`Searcher`]s for multi-threaded query loads.
///
/// Worker threads check a searcher out, run any number of queries on it
/// without holding a lock, and hand it back by dropping the guard. Only the
/// checkout and the return touch the mutex.
#[derive(Debug)]
pub struct SearcherPool {
    idle: Mutex<Vec<Searcher>>,
    max_idle: usize,
}

impl Default for SearcherPool {
    fn default() -> Self {
        Self::new()
    }
}

impl SearcherPool {
    /// A pool that keeps every returned searcher.
    pub fn new() -> Self {
        Self::with_max_idle(usize::MAX)
    }

    /// A pool that keeps at most `max_idle` returned searchers and drops the
    /// rest.
    pub fn with_max_idle(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// Number of searchers currently waiting in the pool.
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    /// Take a searcher sized for `graph`.
    ///
    /// Prefers an idle searcher that already fits the graph, then any idle
    /// searcher (grown to fit), then a new one.
    pub fn checkout(&self, graph: &CompactGraph) -> PooledSearcher<'_> {
        let reused = {
            let mut idle = self.idle.lock();
            match idle.iter().rposition(|s| s.fits(graph)) {
                Some(i) => Some(idle.swap_remove(i)),
                None => idle.pop(),
            }
        };
        let mut searcher = reused.unwrap_or_default();
        searcher.reserve_for(graph);
        PooledSearcher {
            pool: self,
            searcher: Some(searcher),
        }
    }

    fn give_back(&self, searcher: Searcher) {
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(searcher);
        }
    }
}

/// A [`Searcher`] borrowed from a [`SearcherPool`]; returned on drop.
#[derive(Debug)]
pub struct PooledSearcher<'a> {
    pool: &'a SearcherPool,
    searcher: Option<Searcher>,
}

impl PooledSearcher<'_> {
    /// Keep the searcher instead of returning it to the pool.
    pub fn detach(mut self) -> Searcher {
        self.searcher.take().unwrap_or_default()
    }
}

impl Deref for PooledSearcher<'_> {
    type Target = Searcher;

    fn deref(&self) -> &Searcher {
        // Only `detach` and `drop` empty the option, and both consume the
        // guard.
        match &self.searcher {
            Some(s) => s,
            None => unreachable!("pooled searcher used after release"),
        }
    }
}

impl DerefMut for PooledSearcher<'_> {
    fn deref_mut(&mut self) -> &mut Searcher {
        match &mut self.searcher {
            Some(s) => s,
            None => unreachable!("pooled searcher used after release"),
        }
    }
}

impl Drop for PooledSearcher<'_> {
    fn drop(&mut self) {
        if let Some(s) = self.searcher.take() {
            self.pool.give_back(s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::round_trip_graph;
    use crate::Algorithm;
    use waygraph_core::{GraphBuilder, NodeId};

    #[test]
    fn checkout_and_return() {
        let g = round_trip_graph();
        let pool = SearcherPool::new();
        assert_eq!(pool.idle(), 0);
        {
            let mut s = pool.checkout(&g);
            assert!(s.fits(&g));
            let p = s.search(&g, 0, 4, Algorithm::Dijkstra).unwrap();
            assert_eq!(p.nodes(), &[0, 1, 2, 4]);
            assert_eq!(pool.idle(), 0);
        }
        assert_eq!(pool.idle(), 1);
        let _again = pool.checkout(&g);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn prefers_a_searcher_that_already_fits() {
        let small = round_trip_graph();
        let mut b = GraphBuilder::new(500);
        for i in 1..500 {
            b.add_edge(i - 1, i, 1.0).unwrap();
        }
        let big = b.build().unwrap();

        let pool = SearcherPool::new();
        let large = pool.checkout(&big);
        let tiny = pool.checkout(&small);
        drop(large);
        drop(tiny);
        assert_eq!(pool.idle(), 2);

        let s = pool.checkout(&big);
        assert_eq!(s.capacity(), 500);
        let t = pool.checkout(&small);
        assert!(t.fits(&small));
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn max_idle_bounds_the_free_list() {
        let g = round_trip_graph();
        let pool = SearcherPool::with_max_idle(1);
        let a = pool.checkout(&g);
        let b = pool.checkout(&g);
        drop(a);
        drop(b);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn detached_searchers_do_not_return() {
        let g = round_trip_graph();
        let pool = SearcherPool::new();
        let owned = pool.checkout(&g).detach();
        assert!(owned.fits(&g));
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn concurrent_workers_share_one_graph() {
        let mut b = GraphBuilder::new(100);
        for i in 1..100 {
            b.add_undirected(i - 1, i, 1.0).unwrap();
        }
        let g = b.build().unwrap();
        let pool = SearcherPool::new();

        std::thread::scope(|scope| {
            for t in 0..4 {
                let (g, pool) = (&g, &pool);
                scope.spawn(move || {
                    for q in 0..50u32 {
                        let mut s = pool.checkout(g);
                        let (o, d): (NodeId, NodeId) = ((q + t) % 100, (q * 7 + 3) % 100);
                        let p = s.search(g, o, d, Algorithm::Bfs).unwrap();
                        assert_eq!(p.hops(), o.abs_diff(d) as usize);
                    }
                });
            }
        });
        assert!(pool.idle() >= 1 && pool.idle() <= 4);
    }
}
