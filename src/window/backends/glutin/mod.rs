mod visitor;

use crate::errors::*;
use crate::settings::WindowParams;

use super::Visitor;

pub fn new(params: &WindowParams) -> Result<Box<dyn Visitor>> {
    let visitor = self::visitor::GlutinVisitor::from(params)?;
    Ok(Box::new(visitor))
}
