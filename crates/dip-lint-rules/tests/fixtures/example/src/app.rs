use crate::example::{IService, NewManager, NewService, NewServiceInterface};

pub fn run() {
    let service = NewService();
    let widened: Box<dyn IService> = Box::new(NewService());
    let interface = NewServiceInterface();
    // dip-lint: allow(direct-concrete-binding) reason="manager is a value object here"
    let manager = NewManager();
}
