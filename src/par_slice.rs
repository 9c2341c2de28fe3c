use num_traits::Num;
use rayon::prelude::*;

/// Sets each element to the same value.
/// `chunk_size` is break the work into tasks for multi-threading.
pub fn set_value<NumType: Num + Copy + Send + Sync>(
    a_slice: &mut [NumType],
    value: NumType,
    chunk_size: usize,
) {
    a_slice
        .par_chunks_mut(chunk_size)
        .for_each(|a_chunk: &mut [NumType]| {
            for a in a_chunk {
                *a = value;
            }
        });
}

/// Apply `f` to every element in place.
pub fn map_in_place<F: Fn(f64) -> f64 + Sync>(
    a_slice: &mut [f64],
    f: F,
    chunk_size: usize,
) {
    a_slice.par_chunks_mut(chunk_size).for_each(|a_chunk| {
        for a in a_chunk {
            *a = f(*a);
        }
    });
}

pub fn sum_of_squares(a_slice: &[f64], chunk_size: usize) -> f64 {
    a_slice
        .par_chunks(chunk_size)
        .map(|a_chunk| a_chunk.iter().map(|a| a * a).sum::<f64>())
        .sum()
}
