// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Conditional Kernels** - *Pointwise copy-if-else*
//!
//! `out[i] = filter(i) ? lhs[i] : rhs[i]`, with either side a column or a
//! scalar. Validity composes the same way: the selected side's validity
//! becomes the output bit. A null filter entry selects the right side.

use crate::{
    Array, ArrayV, Bitmask, Buffer, DataType, KernelError, MaskedArray, Result, Scalar,
    TemporalArray, TextArray, Vec64,
};

/// One side of a copy-if-else: a column window or a broadcast scalar.
#[derive(Clone, Copy)]
pub enum CopyOperand<'a> {
    Column(&'a ArrayV),
    Scalar(&'a Scalar),
}

impl<'a> CopyOperand<'a> {
    fn dtype(&self) -> Option<DataType> {
        match self {
            CopyOperand::Column(v) => Some(v.dtype()),
            CopyOperand::Scalar(s) => s.dtype(),
        }
    }

    fn check_len(&self, n: usize) -> Result<()> {
        if let CopyOperand::Column(v) = self {
            if v.len() != n {
                return Err(KernelError::invalid_argument(format!(
                    "copy_if_else operand has {} rows, filter has {}",
                    v.len(),
                    n
                )));
            }
        }
        Ok(())
    }
}

/// A resolved fixed-width operand: a borrowed buffer window or a constant.
enum Cell<'a, T> {
    Col(&'a Buffer<T>, Option<&'a Bitmask>, usize),
    Const(Option<T>),
}

impl<T: Copy> Cell<'_, T> {
    #[inline]
    fn get(&self, i: usize) -> Option<T> {
        match self {
            Cell::Col(data, mask, offset) => {
                let abs = offset + i;
                match mask {
                    Some(m) => {
                        if m.get(abs) {
                            Some(data[abs])
                        } else {
                            None
                        }
                    }
                    None => Some(data[abs]),
                }
            }
            Cell::Const(v) => *v,
        }
    }
}

/// Pointwise select between two operands of matching type, driven by a
/// `Bool8` filter column.
pub fn copy_if_else(lhs: CopyOperand, rhs: CopyOperand, filter: &ArrayV) -> Result<Array> {
    if filter.dtype() != DataType::Bool8 {
        return Err(KernelError::type_mismatch(format!(
            "copy_if_else filter must be bool8, found {}",
            filter.dtype()
        )));
    }
    let n = filter.len();
    lhs.check_len(n)?;
    rhs.check_len(n)?;

    let dtype = match (lhs.dtype(), rhs.dtype()) {
        (Some(a), Some(b)) => {
            if a != b {
                return Err(KernelError::type_mismatch(format!(
                    "copy_if_else operand types differ: {} vs {}",
                    a, b
                )));
            }
            a
        }
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => {
            return Err(KernelError::invalid_argument(
                "copy_if_else requires at least one typed operand",
            ));
        }
    };

    let filter_bools = filter.array.bool_()?;
    let pick_left =
        |i: usize| filter.is_valid(i) && unsafe { filter_bools.data.get_unchecked(filter.offset + i) };

    macro_rules! operand_cell {
        ($op:expr, $arm:ident.$leaf:ident, $from_scalar:expr) => {
            match $op {
                CopyOperand::Column(v) => {
                    let arr = v.array.$arm()?.$leaf()?;
                    Cell::Col(&arr.data, arr.null_mask.as_ref(), v.offset)
                }
                CopyOperand::Scalar(s) => Cell::Const($from_scalar(s)?),
            }
        };
    }

    macro_rules! fixed_arm {
        ($t:ty, $arm:ident.$leaf:ident, $from_scalar:expr, $wrap:expr) => {{
            let lcell: Cell<'_, $t> = operand_cell!(lhs, $arm.$leaf, $from_scalar);
            let rcell: Cell<'_, $t> = operand_cell!(rhs, $arm.$leaf, $from_scalar);
            let mut data = Vec64::with_capacity(n);
            let mut mask = Bitmask::new_set_all(n, true);
            let mut any_null = false;
            for i in 0..n {
                let v = if pick_left(i) { lcell.get(i) } else { rcell.get(i) };
                match v {
                    Some(v) => data.push(v),
                    None => {
                        data.push(Default::default());
                        unsafe { mask.set_unchecked(i, false) };
                        any_null = true;
                    }
                }
            }
            Ok($wrap(data, if any_null { Some(mask) } else { None }))
        }};
    }

    match &dtype {
        DataType::Int8 => fixed_arm!(i8, num.i8, |s: &Scalar| -> Result<Option<i8>> { match s { Scalar::Int8(x) => Ok(Some(*x)), Scalar::Null => Ok(None), other => Err(KernelError::type_mismatch(format!("scalar {:?} does not match column type", other))) } }, |d, m| {
            Array::from_int8(crate::IntegerArray::new(d, m))
        }),
        DataType::Int16 => fixed_arm!(i16, num.i16, |s: &Scalar| -> Result<Option<i16>> { match s { Scalar::Int16(x) => Ok(Some(*x)), Scalar::Null => Ok(None), other => Err(KernelError::type_mismatch(format!("scalar {:?} does not match column type", other))) } }, |d, m| {
            Array::from_int16(crate::IntegerArray::new(d, m))
        }),
        DataType::Int32 => fixed_arm!(i32, num.i32, |s: &Scalar| -> Result<Option<i32>> { match s { Scalar::Int32(x) => Ok(Some(*x)), Scalar::Null => Ok(None), other => Err(KernelError::type_mismatch(format!("scalar {:?} does not match column type", other))) } }, |d, m| {
            Array::from_int32(crate::IntegerArray::new(d, m))
        }),
        DataType::Int64 => fixed_arm!(i64, num.i64, |s: &Scalar| -> Result<Option<i64>> { match s { Scalar::Int64(x) => Ok(Some(*x)), Scalar::Null => Ok(None), other => Err(KernelError::type_mismatch(format!("scalar {:?} does not match column type", other))) } }, |d, m| {
            Array::from_int64(crate::IntegerArray::new(d, m))
        }),
        DataType::UInt8 => fixed_arm!(u8, num.u8, |s: &Scalar| -> Result<Option<u8>> { match s { Scalar::UInt8(x) => Ok(Some(*x)), Scalar::Null => Ok(None), other => Err(KernelError::type_mismatch(format!("scalar {:?} does not match column type", other))) } }, |d, m| {
            Array::from_uint8(crate::IntegerArray::new(d, m))
        }),
        DataType::UInt16 => fixed_arm!(u16, num.u16, |s: &Scalar| -> Result<Option<u16>> { match s { Scalar::UInt16(x) => Ok(Some(*x)), Scalar::Null => Ok(None), other => Err(KernelError::type_mismatch(format!("scalar {:?} does not match column type", other))) } }, |d, m| {
            Array::from_uint16(crate::IntegerArray::new(d, m))
        }),
        DataType::UInt32 => fixed_arm!(u32, num.u32, |s: &Scalar| -> Result<Option<u32>> { match s { Scalar::UInt32(x) => Ok(Some(*x)), Scalar::Null => Ok(None), other => Err(KernelError::type_mismatch(format!("scalar {:?} does not match column type", other))) } }, |d, m| {
            Array::from_uint32(crate::IntegerArray::new(d, m))
        }),
        DataType::UInt64 => fixed_arm!(u64, num.u64, |s: &Scalar| -> Result<Option<u64>> { match s { Scalar::UInt64(x) => Ok(Some(*x)), Scalar::Null => Ok(None), other => Err(KernelError::type_mismatch(format!("scalar {:?} does not match column type", other))) } }, |d, m| {
            Array::from_uint64(crate::IntegerArray::new(d, m))
        }),
        DataType::Float32 => {
            fixed_arm!(f32, num.f32, |s: &Scalar| -> Result<Option<f32>> { match s { Scalar::Float32(x) => Ok(Some(*x)), Scalar::Null => Ok(None), other => Err(KernelError::type_mismatch(format!("scalar {:?} does not match column type", other))) } }, |d, m| {
                Array::from_float32(crate::FloatArray::new(d, m))
            })
        }
        DataType::Float64 => {
            fixed_arm!(f64, num.f64, |s: &Scalar| -> Result<Option<f64>> { match s { Scalar::Float64(x) => Ok(Some(*x)), Scalar::Null => Ok(None), other => Err(KernelError::type_mismatch(format!("scalar {:?} does not match column type", other))) } }, |d, m| {
                Array::from_float64(crate::FloatArray::new(d, m))
            })
        }
        DataType::Bool8 => {
            macro_rules! bool_operand {
                ($op:expr) => {
                    match $op {
                        CopyOperand::Column(v) => (Some(v.array.bool_()?), None, v.offset),
                        CopyOperand::Scalar(Scalar::Boolean(b)) => (None, Some(*b), 0),
                        CopyOperand::Scalar(Scalar::Null) => (None, None, 0),
                        CopyOperand::Scalar(other) => {
                            return Err(KernelError::type_mismatch(format!(
                                "scalar {:?} does not match bool8",
                                other
                            )));
                        }
                    }
                };
            }
            let l = bool_operand!(lhs);
            let r = bool_operand!(rhs);
            let get = |side: &(Option<&crate::BooleanArray>, Option<bool>, usize), i: usize| match side {
                (Some(arr), _, off) => {
                    if arr.is_null(off + i) {
                        None
                    } else {
                        Some(unsafe { arr.data.get_unchecked(off + i) })
                    }
                }
                (None, v, _) => *v,
            };
            let mut data = Bitmask::new_set_all(n, false);
            let mut mask = Bitmask::new_set_all(n, true);
            let mut any_null = false;
            for i in 0..n {
                let v = if pick_left(i) { get(&l, i) } else { get(&r, i) };
                match v {
                    Some(true) => unsafe { data.set_unchecked(i, true) },
                    Some(false) => {}
                    None => {
                        unsafe { mask.set_unchecked(i, false) };
                        any_null = true;
                    }
                }
            }
            Ok(Array::from_bool(crate::BooleanArray::new(
                data,
                if any_null { Some(mask) } else { None },
            )))
        }
        DataType::String | DataType::Dictionary => {
            macro_rules! text_operand {
                ($op:expr) => {
                    match $op {
                        CopyOperand::Column(v) => (Some((v.array.text()?, v.offset)), None),
                        CopyOperand::Scalar(Scalar::String(s)) => (None, Some(s.as_str())),
                        CopyOperand::Scalar(Scalar::Null) => (None, None),
                        CopyOperand::Scalar(other) => {
                            return Err(KernelError::type_mismatch(format!(
                                "scalar {:?} does not match string",
                                other
                            )));
                        }
                    }
                };
            }
            let l = text_operand!(lhs);
            let r = text_operand!(rhs);
            fn get<'a>(
                side: &'a (Option<(&'a TextArray, usize)>, Option<&'a str>),
                i: usize,
            ) -> Option<&'a str> {
                match side {
                    (Some((text, off)), _) => text.get_str(off + i),
                    (None, v) => *v,
                }
            }
            let mut out = crate::StringArray::<u32>::with_capacity(n, 0, true);
            for i in 0..n {
                let v = if pick_left(i) { get(&l, i) } else { get(&r, i) };
                match v {
                    Some(s) => out.push_str(s),
                    None => out.push_null(),
                }
            }
            Ok(Array::from_string32(out))
        }
        DataType::Date32 => {
            fixed_arm!(
                i32,
                temporal.dt32,
                |s: &Scalar| -> Result<Option<i32>> {
                    match s {
                        Scalar::Datetime32(v, _) => Ok(Some(*v)),
                        Scalar::Null => Ok(None),
                        other => Err(KernelError::type_mismatch(format!(
                            "scalar {:?} does not match date32",
                            other
                        ))),
                    }
                },
                |d, m| {
                    Array::from_datetime32(crate::DatetimeArray::new(d, m, crate::TimeUnit::Days))
                }
            )
        }
        DataType::Date64 | DataType::Timestamp(_) | DataType::Duration(_) => {
            let unit = match (lhs, rhs) {
                (CopyOperand::Column(v), _) | (_, CopyOperand::Column(v)) => match &v.array {
                    Array::TemporalArray(TemporalArray::Datetime64(a)) => a.time_unit,
                    _ => crate::TimeUnit::Milliseconds,
                },
                _ => crate::TimeUnit::Milliseconds,
            };
            fixed_arm!(
                i64,
                temporal.dt64,
                |s: &Scalar| -> Result<Option<i64>> {
                    match s {
                        Scalar::Datetime64(v, _) => Ok(Some(*v)),
                        Scalar::Null => Ok(None),
                        other => Err(KernelError::type_mismatch(format!(
                            "scalar {:?} does not match temporal column",
                            other
                        ))),
                    }
                },
                |d, m| { Array::from_datetime64(crate::DatetimeArray::new(d, m, unit)) }
            )
        }
        other => Err(KernelError::type_not_supported(format!(
            "copy_if_else does not support {}",
            other
        ))),
    }
}
