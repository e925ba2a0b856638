mod finite_difference;

pub(crate) use finite_difference::forward_difference_jacobian;
