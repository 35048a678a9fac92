#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Declare a [`Straw`](crate::Straw).
///
/// ```ignore
/// straw! {
///     name: "mint: internal transfer",
///     checks: [has_operation(MsgOp::JettonInternalTransfer)],
///     build: |mint: &mut JettonMint, tx: &TxRecord| {
///         mint.recipient_wallet = tx.account.address;
///         Ok(())
///     },
///     children: [straw! { name: "mint: excess", checks: [is_tx(), has_operation(MsgOp::Excess)], optional: true }],
/// }
/// ```
///
/// A `build` block always receives a `&TxRecord`; the macro puts `is_tx()` in
/// front of the declared checks so that builder can never see another payload.
#[macro_export]
macro_rules! straw {
    (@tx_check) => {
        ::std::vec::Vec::new()
    };
    (@tx_check $tx:ident) => {
        ::std::vec![$crate::straws::checks::is_tx()]
    };
    (@builder) => {
        ::std::option::Option::None
    };
    (@builder $action:ident $act_ty:ty, $tx:ident $body:block) => {
        ::std::option::Option::Some($crate::with_tx(
            move |$action: &mut $act_ty, $tx: &$crate::TxRecord| -> ::std::result::Result<(), $crate::BuildError> { $body },
        ))
    };
    (
        name: $name:expr
        $(, checks: [ $($check:expr),* $(,)? ])?
        $(, build: |$action:ident : &mut $act_ty:ty, $tx:ident : &TxRecord| $body:block)?
        $(, children: [ $($child:expr),* $(,)? ])?
        $(, optional: $optional:expr)?
        $(,)?
    ) => {{
        #[allow(unused_mut)]
        let mut checks: ::std::vec::Vec<$crate::Check> = $crate::straw!(@tx_check $($tx)?);
        $($( checks.push($check); )*)?
        $crate::Straw {
            name: $name,
            checks,
            builder: $crate::straw!(@builder $($action $act_ty, $tx $body)?),
            children: ::std::vec![ $($($child),*)? ],
            optional: false $(|| $optional)?,
        }
    }};
}
