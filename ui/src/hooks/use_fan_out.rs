use lifecycle::{FanOut, FanOutStates};
use payloads::ClientError;
use std::rc::Rc;
use yew::prelude::*;

pub struct UseFanOutHandle<T> {
    pub states: FanOutStates<T>,
    /// Run every operation again, superseding the previous batch.
    pub refresh: Callback<()>,
}

/// Run a fixed set of named operations side by side on mount.
///
/// `build` is called once; the resulting operations are kept for the life
/// of the component.
#[hook]
pub fn use_fan_out<T, B>(build: B) -> UseFanOutHandle<T>
where
    T: Clone + 'static,
    B: FnOnce() -> FanOut<T, ClientError>,
{
    let fan_out: Rc<FanOut<T, ClientError>> = use_memo((), move |_| build());
    let states = {
        let fan_out = fan_out.clone();
        use_state(move || fan_out.states())
    };

    {
        let fan_out = fan_out.clone();
        let states = states.clone();
        use_effect_with((), move |_| {
            fan_out.subscribe(move |snapshot| states.set(snapshot.clone()));
            yew::platform::spawn_local(fan_out.execute_all());
            move || fan_out.teardown()
        });
    }

    let refresh = Callback::from(move |_| {
        yew::platform::spawn_local(fan_out.execute_all());
    });

    UseFanOutHandle {
        states: (*states).clone(),
        refresh,
    }
}
