use std::rc::Rc;

use super::Signal;

/// Payload-tuple adapter connecting one callback arity to the generic
/// [`Signal`] engine.
///
/// The engine itself only ever deals with a single-argument wrapped callback
/// (`Rc<dyn Fn(A)>` over the payload tuple `A`); each arity supplies the
/// exposed callable shape and the packing/unpacking glue. Implemented for
/// tuples of arity 0 through 4.
pub trait SignalArgs: Clone + 'static {
    /// The callable shape exposed to callers, e.g. `dyn Fn(T1, T2)`.
    type Callback: ?Sized + 'static;

    /// Adapt an exposed callback into the internal single-argument form.
    fn wrap(callback: Rc<Self::Callback>) -> Rc<dyn Fn(Self)>;

    /// Build an exposed callback that discards its arguments. Used by wait
    /// steps that only care that the signal fired, not what it carried.
    fn ignoring(f: impl Fn() + 'static) -> Rc<Self::Callback>;
}

impl SignalArgs for () {
    type Callback = dyn Fn();

    fn wrap(callback: Rc<Self::Callback>) -> Rc<dyn Fn(Self)> {
        Rc::new(move |()| callback())
    }

    fn ignoring(f: impl Fn() + 'static) -> Rc<Self::Callback> {
        Rc::new(f)
    }
}

macro_rules! impl_signal_args {
    ($(($($ty:ident => $idx:tt),+))+) => {$(
        impl<$($ty: Clone + 'static),+> SignalArgs for ($($ty,)+) {
            type Callback = dyn Fn($($ty),+);

            fn wrap(callback: Rc<Self::Callback>) -> Rc<dyn Fn(Self)> {
                Rc::new(move |args: Self| callback($(args.$idx),+))
            }

            fn ignoring(f: impl Fn() + 'static) -> Rc<Self::Callback> {
                Rc::new(move |$(_: $ty),+| f())
            }
        }
    )+};
}

impl_signal_args! {
    (T1 => 0)
    (T1 => 0, T2 => 1)
    (T1 => 0, T2 => 1, T3 => 2)
    (T1 => 0, T2 => 1, T3 => 2, T4 => 3)
}

// Per-arity emit sugar so call sites pass plain arguments instead of the
// payload tuple. Each forwards to the generic `emit_payload`.

impl Signal<()> {
    pub fn emit(&self) {
        self.emit_payload(());
    }
}

impl<T1: Clone + 'static> Signal<(T1,)> {
    pub fn emit(&self, a1: T1) {
        self.emit_payload((a1,));
    }
}

impl<T1: Clone + 'static, T2: Clone + 'static> Signal<(T1, T2)> {
    pub fn emit(&self, a1: T1, a2: T2) {
        self.emit_payload((a1, a2));
    }
}

impl<T1: Clone + 'static, T2: Clone + 'static, T3: Clone + 'static> Signal<(T1, T2, T3)> {
    pub fn emit(&self, a1: T1, a2: T2, a3: T3) {
        self.emit_payload((a1, a2, a3));
    }
}

impl<T1: Clone + 'static, T2: Clone + 'static, T3: Clone + 'static, T4: Clone + 'static>
    Signal<(T1, T2, T3, T4)>
{
    pub fn emit(&self, a1: T1, a2: T2, a3: T3, a4: T4) {
        self.emit_payload((a1, a2, a3, a4));
    }
}
