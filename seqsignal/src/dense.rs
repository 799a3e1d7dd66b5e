//! Dense matrix storage with a constant number of columns.

use std::fmt::Debug;
use std::fmt::Error as FmtError;
use std::fmt::Formatter;
use std::iter::FusedIterator;
use std::ops::Index;
use std::ops::IndexMut;
use std::slice::ChunksExact;
use std::slice::ChunksExactMut;

use typenum::marker_traits::NonZero;
use typenum::marker_traits::Unsigned;

// --- DenseMatrix -------------------------------------------------------------

/// A row-major dense matrix with a constant number of columns.
///
/// The number of columns is given at the type level, so that matrices over
/// an alphabet always have one column per symbol.
#[derive(Clone, PartialEq)]
pub struct DenseMatrix<T: Default + Copy, C: Unsigned + NonZero> {
    data: Vec<T>,
    rows: usize,
    _columns: std::marker::PhantomData<C>,
}

impl<T: Default + Copy, C: Unsigned + NonZero> DenseMatrix<T, C> {
    /// Create a new matrix with the given number of rows.
    pub fn new(rows: usize) -> Self {
        Self {
            data: vec![T::default(); rows * C::USIZE],
            rows,
            _columns: std::marker::PhantomData,
        }
    }

    /// Create a new dense matrix from an iterable of rows.
    ///
    /// # Panics
    ///
    /// Panics if any of the rows does not have the number of elements
    /// corresponding to the dense matrix columns.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: AsRef<[T]>,
    {
        let mut data = Vec::new();
        let mut n = 0;
        for row in rows {
            let row = row.as_ref();
            assert_eq!(row.len(), C::USIZE, "row {} has the wrong length", n);
            data.extend_from_slice(row);
            n += 1;
        }
        Self {
            data,
            rows: n,
            _columns: std::marker::PhantomData,
        }
    }

    /// The number of columns of the matrix.
    #[inline]
    pub const fn columns(&self) -> usize {
        C::USIZE
    }

    /// The number of rows of the matrix.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Iterate over the rows of the matrix.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            chunks: self.data.chunks_exact(C::USIZE),
        }
    }

    /// Returns an iterator that allows modifying each row.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            chunks: self.data.chunks_exact_mut(C::USIZE),
        }
    }

    /// Iterate over the values of a single column, from the first row.
    ///
    /// # Panics
    ///
    /// Panics if `column` is not smaller than the number of columns.
    pub fn column(&self, column: usize) -> impl Iterator<Item = T> + '_ {
        assert!(column < C::USIZE, "column index out of bounds: {}", column);
        self.iter().map(move |row| row[column])
    }

    /// Fill the entire matrix with a constant value.
    #[inline]
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Build a new matrix of the same shape by applying `f` to every cell.
    pub fn map<U, F>(&self, mut f: F) -> DenseMatrix<U, C>
    where
        U: Default + Copy,
        F: FnMut(T) -> U,
    {
        DenseMatrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            rows: self.rows,
            _columns: std::marker::PhantomData,
        }
    }
}

impl<T: Default + Copy + Debug, C: Unsigned + NonZero> Debug for DenseMatrix<T, C> {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Default + Copy, C: Unsigned + NonZero> Index<usize> for DenseMatrix<T, C> {
    type Output = [T];
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        let row = C::USIZE * index;
        &self.data[row..row + C::USIZE]
    }
}

impl<T: Default + Copy, C: Unsigned + NonZero> IndexMut<usize> for DenseMatrix<T, C> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let row = C::USIZE * index;
        &mut self.data[row..row + C::USIZE]
    }
}

impl<'a, T: Default + Copy, C: Unsigned + NonZero> IntoIterator for &'a DenseMatrix<T, C> {
    type Item = &'a [T];
    type IntoIter = Iter<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Default + Copy, C: Unsigned + NonZero> IntoIterator for &'a mut DenseMatrix<T, C> {
    type Item = &'a mut [T];
    type IntoIter = IterMut<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// --- Iter --------------------------------------------------------------------

/// An iterator over the rows of a dense matrix.
pub struct Iter<'a, T> {
    chunks: ChunksExact<'a, T>,
}

/// An iterator over the mutable rows of a dense matrix.
pub struct IterMut<'a, T> {
    chunks: ChunksExactMut<'a, T>,
}

// --- iterator ----------------------------------------------------------------

macro_rules! iterator {
    ($t:ident, $($item:tt)*) => {
        impl<'a, T> Iterator for $t<'a, T> {
            type Item = &'a $($item)*;
            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.chunks.next()
            }
            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.chunks.size_hint()
            }
        }

        impl<'a, T> ExactSizeIterator for $t<'a, T> {}

        impl<'a, T> FusedIterator for $t<'a, T> {}

        impl<'a, T> DoubleEndedIterator for $t<'a, T> {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> {
                self.chunks.next_back()
            }
        }
    };
}

iterator!(Iter, [T]);
iterator!(IterMut, mut [T]);
