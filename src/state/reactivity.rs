// ============================================================================
// REACTIVITY - Estado compartido con subscribers
// ============================================================================
// Un solo hilo (UI): Rc<RefCell>. Los clones comparten valor Y subscribers.
// Nunca mantener un borrow a través de un `.await`.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Subscriber<T> = Rc<dyn Fn(&T)>;

/// Estado reactivo con sistema de notificaciones
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<Subscriber<T>>>>,
}

impl<T> ReactiveState<T> {
    /// Crear nuevo estado reactivo
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Leer el valor sin clonarlo
    pub fn with<R>(&self, reader: impl FnOnce(&T) -> R) -> R {
        reader(&*self.value.borrow())
    }

    /// Suscribirse a cambios
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&T) + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }
}

impl<T: Clone> ReactiveState<T> {
    /// Copia del valor actual
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Establecer nuevo valor y notificar subscribers
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Actualizar valor usando closure y notificar
    pub fn update<R>(&self, updater: impl FnOnce(&mut T) -> R) -> R {
        let result = updater(&mut *self.value.borrow_mut());
        self.notify();
        result
    }

    /// Notificar a todos los subscribers
    fn notify(&self) {
        // Copias de la lista y del valor: un subscriber puede suscribir a
        // otro o escribir en este mismo estado sin re-borrow
        let subscribers: Vec<Subscriber<T>> = self.subscribers.borrow().clone();
        let value = self.get();
        for callback in subscribers {
            callback(&value);
        }
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<T: Default> Default for ReactiveState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn clones_share_value_and_subscribers() {
        let state = ReactiveState::new(0u32);
        let seen = Rc::new(Cell::new(0u32));
        {
            let seen = seen.clone();
            state.subscribe(move |value| seen.set(*value));
        }

        let other = state.clone();
        other.set(7);

        assert_eq!(state.get(), 7);
        assert_eq!(seen.get(), 7);
    }

    #[test]
    fn update_returns_closure_result() {
        let state = ReactiveState::new(vec![1, 2]);
        let popped = state.update(|items| items.pop());
        assert_eq!(popped, Some(2));
        assert_eq!(state.with(|items| items.len()), 1);
    }

    #[test]
    fn subscriber_may_write_back_into_same_state() {
        let state = ReactiveState::new(1u32);
        {
            let writer = state.clone();
            // normaliza a par: 3 → 4, 4 ya no vuelve a escribir
            state.subscribe(move |value| {
                if value % 2 == 1 {
                    writer.set(value + 1);
                }
            });
        }

        state.set(3);

        assert_eq!(state.get(), 4);
    }
}
