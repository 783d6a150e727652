use gcode_api_rest::RestServer;
use gcode_core_contact_impl::ContactFeatureServiceImpl;
use gcode_core_health_impl::HealthFeatureServiceImpl;
use gcode_email_impl::EmailServiceImpl;
use gcode_shared_impl::time::TimeServiceImpl;
use gcode_templates_impl::TemplateServiceImpl;

pub type Time = TimeServiceImpl;
pub type Email = EmailServiceImpl;
pub type Template = TemplateServiceImpl;
pub type Contact = ContactFeatureServiceImpl<Email, Template>;
pub type Health = HealthFeatureServiceImpl<Time, Email>;
pub type Rest = RestServer<Contact, Health, Time>;
