//! Services of the example application.

pub struct Service;
pub struct Manager;
pub struct Helper;

pub trait IService {}
pub trait IManager {}

impl IService for Service {}
impl IManager for Manager {}

pub fn NewService() -> Service {
    Service
}

pub fn NewServiceInterface() -> Box<dyn IService> {
    Box::new(Service)
}

pub fn NewManager() -> Manager {
    Manager
}

pub fn NewManagerInterface() -> impl IManager {
    Manager
}

pub fn CreateHelper() -> Helper {
    Helper
}

pub fn CreateHelperInterface() -> Box<dyn IService> {
    Box::new(Service)
}

pub fn add(a: i32, b: i32) -> i32 {
    a + b
}
