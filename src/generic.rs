//! Statically typed counterparts of the dynamic sequence operations.
//!
//! Here the compiler does the checking that [`crate::shape`] does at runtime:
//! a predicate is any `FnMut(&E) -> bool`, a combiner any `FnMut(E, &E) -> E`.
//! Traversal order and short-circuiting are the same as in [`crate::builtin::sequence`].

use either::Either;
use itertools::Itertools;

pub use crate::builtin::repeat::{repeat_fn, repeat_fn_with};

pub trait SliceOps<E> {
    fn filter<P: FnMut(&E) -> bool>(&self, pred: P) -> Vec<E>
    where
        E: Clone;

    fn filter_not<P: FnMut(&E) -> bool>(&self, pred: P) -> Vec<E>
    where
        E: Clone;

    fn partition_by<P: FnMut(&E) -> bool>(&self, pred: P) -> (Vec<E>, Vec<E>)
    where
        E: Clone;

    fn for_all<P: FnMut(&E) -> bool>(&self, pred: P) -> bool;

    fn for_any<P: FnMut(&E) -> bool>(&self, pred: P) -> bool;

    fn for_each<F: FnMut(&E)>(&self, action: F);

    fn map<R, F: FnMut(&E) -> R>(&self, transform: F) -> Vec<R>;

    fn reduce<F: FnMut(E, &E) -> E>(&self, initial: E, combine: F) -> E;

    fn compare<F: FnMut(&E, &E) -> bool>(&self, other: &[E], eq: F) -> bool;
}

impl<E> SliceOps<E> for [E] {
    fn filter<P: FnMut(&E) -> bool>(&self, mut pred: P) -> Vec<E>
    where
        E: Clone,
    {
        self.iter().filter(|e| pred(e)).cloned().collect()
    }

    fn filter_not<P: FnMut(&E) -> bool>(&self, mut pred: P) -> Vec<E>
    where
        E: Clone,
    {
        self.iter().filter(|e| !pred(e)).cloned().collect()
    }

    fn partition_by<P: FnMut(&E) -> bool>(&self, mut pred: P) -> (Vec<E>, Vec<E>)
    where
        E: Clone,
    {
        self.iter().partition_map(|e| {
            if pred(e) {
                Either::Left(e.clone())
            } else {
                Either::Right(e.clone())
            }
        })
    }

    fn for_all<P: FnMut(&E) -> bool>(&self, pred: P) -> bool {
        self.iter().all(pred)
    }

    fn for_any<P: FnMut(&E) -> bool>(&self, pred: P) -> bool {
        self.iter().any(pred)
    }

    fn for_each<F: FnMut(&E)>(&self, action: F) {
        self.iter().for_each(action)
    }

    fn map<R, F: FnMut(&E) -> R>(&self, transform: F) -> Vec<R> {
        self.iter().map(transform).collect()
    }

    fn reduce<F: FnMut(E, &E) -> E>(&self, initial: E, combine: F) -> E {
        self.iter().fold(initial, combine)
    }

    fn compare<F: FnMut(&E, &E) -> bool>(&self, other: &[E], mut eq: F) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| eq(a, b))
    }
}

macro_rules! bind {
    ($name:ident, $($arg:ident: $t:ident),*) => {
        /// Capture arguments now, call later. Every call of the returned closure
        /// calls `func` again with clones of the same arguments.
        pub fn $name<$($t: Clone,)* R, F>(func: F, $($arg: $t),*) -> impl Fn() -> R
        where
            F: Fn($($t),*) -> R,
        {
            move || func($($arg.clone()),*)
        }
    };
}

bind!(bind0,);
bind!(bind1, a0: A0);
bind!(bind2, a0: A0, a1: A1);
bind!(bind3, a0: A0, a1: A1, a2: A2);
bind!(bind4, a0: A0, a1: A1, a2: A2, a3: A3);
