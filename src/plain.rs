//! Fixed-layout ("plain old data") values.
//!
//! A [`Plain`] type knows how to turn itself into exactly [`Plain::SIZE`] bytes
//! and back. Byte order is always the host's: nothing here normalizes
//! endianness, so files written on one architecture are only guaranteed to read
//! back on the same kind of host.

/// A value with a fixed-size byte image and no indirection.
///
/// `decode(encode(v))` must reproduce `v` exactly. Implementations must write
/// and read exactly `SIZE` bytes; the slices handed to [`Plain::encode`] and
/// [`Plain::decode`] are always exactly that long.
///
/// Caller structs can use [`impl_plain!`](crate::impl_plain) instead of writing
/// the impl by hand:
///
/// ```
/// use plainfile::{impl_plain, Plain};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// #[repr(C)]
/// struct Pack {
///     a: i32,
///     b: i32,
/// }
///
/// impl_plain!(Pack { a: i32, b: i32 });
///
/// let pack = Pack { a: 1, b: 2 };
/// assert_eq!(Pack::SIZE, 8);
/// assert_eq!(Pack::decode(&pack.to_bytes()), pack);
/// ```
pub trait Plain: Copy {
    /// Number of bytes in the stored image.
    const SIZE: usize;

    /// Writes the byte image of `self` into `out` (`out.len() == SIZE`).
    fn encode(&self, out: &mut [u8]);

    /// Rebuilds a value from its byte image (`bytes.len() == SIZE`).
    fn decode(bytes: &[u8]) -> Self;

    /// The value whose byte image is all zeros.
    fn zeroed() -> Self {
        Self::decode(&vec![0u8; Self::SIZE])
    }

    /// Returns the byte image as a freshly allocated vector.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::SIZE];
        self.encode(&mut out);
        out
    }
}

/// Encodes `values` back to back into `out`, which must hold
/// `values.len() * T::SIZE` bytes.
pub fn encode_slice<T: Plain>(values: &[T], out: &mut [u8]) {
    if T::SIZE == 0 {
        return;
    }
    for (value, chunk) in values.iter().zip(out.chunks_exact_mut(T::SIZE)) {
        value.encode(chunk);
    }
}

/// Decodes consecutive images from `bytes` into `values`.
///
/// Only complete images are decoded; returns how many elements were filled.
pub fn decode_slice<T: Plain>(bytes: &[u8], values: &mut [T]) -> usize {
    if T::SIZE == 0 {
        return values.len();
    }
    let mut filled = 0;
    for (slot, chunk) in values.iter_mut().zip(bytes.chunks_exact(T::SIZE)) {
        *slot = T::decode(chunk);
        filled += 1;
    }
    filled
}

macro_rules! plain_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Plain for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn encode(&self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }

                fn decode(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_ne_bytes(raw)
                }
            }
        )*
    };
}

plain_number!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl Plain for bool {
    const SIZE: usize = 1;

    fn encode(&self, out: &mut [u8]) {
        out[0] = u8::from(*self);
    }

    // Any non-zero byte reads back as `true`.
    fn decode(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

impl Plain for char {
    const SIZE: usize = 4;

    fn encode(&self, out: &mut [u8]) {
        u32::from(*self).encode(out);
    }

    fn decode(bytes: &[u8]) -> Self {
        char::from_u32(u32::decode(bytes)).unwrap_or_default()
    }
}

impl<T: Plain, const N: usize> Plain for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn encode(&self, out: &mut [u8]) {
        encode_slice(self, out);
    }

    fn decode(bytes: &[u8]) -> Self {
        let mut values = [T::zeroed(); N];
        decode_slice(bytes, &mut values);
        values
    }
}

/// Implements [`Plain`] for a struct whose fields are all `Plain`.
///
/// Fields are stored in the order they are listed, with no padding between
/// them. Every field of the struct must be listed, since decoding builds the
/// struct from the listed fields alone.
#[macro_export]
macro_rules! impl_plain {
    ($name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        impl $crate::Plain for $name {
            const SIZE: usize = 0 $(+ <$ty as $crate::Plain>::SIZE)*;

            #[allow(unused_assignments, unused_variables, unused_mut)]
            fn encode(&self, out: &mut [u8]) {
                let mut at = 0usize;
                $(
                    let end = at + <$ty as $crate::Plain>::SIZE;
                    $crate::Plain::encode(&self.$field, &mut out[at..end]);
                    at = end;
                )*
            }

            #[allow(unused_assignments, unused_variables, unused_mut)]
            fn decode(bytes: &[u8]) -> Self {
                let mut at = 0usize;
                $name {
                    $(
                        $field: {
                            let end = at + <$ty as $crate::Plain>::SIZE;
                            let field = <$ty as $crate::Plain>::decode(&bytes[at..end]);
                            at = end;
                            field
                        },
                    )*
                }
            }
        }
    };
}
